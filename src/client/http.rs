//! HTTP implementation of [`AssistantClient`]

use super::{AssistantClient, HistoryFormat, ReplyStream, RequestContext, TransportError};
use crate::config::ChatConfig;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};
use std::time::Duration;

/// Most of a failure body kept for the error message
const ERROR_BODY_LIMIT: usize = 512;
/// How long to wait for a failure body before giving up on it
const ERROR_BODY_WAIT: Duration = Duration::from_secs(2);

/// Posts queries to the assistant's invoke endpoint
pub struct HttpAssistantClient {
    client: Client,
    url: String,
    history_format: HistoryFormat,
}

impl HttpAssistantClient {
    pub fn new(config: &ChatConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.invoke_url(),
            history_format: config.history_format,
        })
    }
}

#[async_trait]
impl AssistantClient for HttpAssistantClient {
    async fn invoke(&self, request: &RequestContext) -> Result<ReplyStream, TransportError> {
        let response = self
            .client
            .post(&self.url)
            .header("accept", "text/event-stream")
            .json(&request.body(self.history_format))
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body_preview(response).await;
            return Err(TransportError::status(status.as_u16(), &body));
        }

        let body = response.bytes_stream().map(|chunk| {
            chunk
                .map(|bytes| bytes.to_vec())
                .map_err(|e| TransportError::read(format!("Reply stream interrupted: {e}")))
        });

        Ok(body.boxed())
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

/// Start of a failure body, bounded in size and in wait time.
///
/// The rest of the body is never read, so a backend holding the
/// connection open cannot stall the cycle.
async fn error_body_preview(mut response: Response) -> String {
    match tokio::time::timeout(ERROR_BODY_WAIT, response.chunk()).await {
        Ok(Ok(Some(bytes))) => {
            let end = bytes.len().min(ERROR_BODY_LIMIT);
            String::from_utf8_lossy(&bytes[..end]).into_owned()
        }
        Ok(Ok(None)) => String::new(),
        Ok(Err(e)) => {
            tracing::debug!(error = %e, "Failed to read error body");
            String::new()
        }
        Err(_) => {
            tracing::debug!("Gave up waiting for error body");
            String::new()
        }
    }
}
