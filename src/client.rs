//! Assistant endpoint client
//!
//! Sends a query plus prior history and hands back the reply body as a raw
//! byte stream for [`crate::stream::decode_reply`].

mod error;
mod http;

pub use error::{TransportError, TransportErrorKind};
pub use http::HttpAssistantClient;

use crate::conversation::{Role, Turn};
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;

/// Reply body as it arrives from the transport
pub type ReplyStream = BoxStream<'static, Result<Vec<u8>, TransportError>>;

/// Everything sent for one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub query: String,
    /// Turns preceding the query, oldest first
    pub history: Vec<Turn>,
}

impl RequestContext {
    pub fn new(query: impl Into<String>, history: Vec<Turn>) -> Self {
        Self {
            query: query.into(),
            history,
        }
    }

    /// JSON request body in the given history format
    pub fn body(&self, format: HistoryFormat) -> InvokeBody<'_> {
        InvokeBody {
            query: &self.query,
            history: self
                .history
                .iter()
                .map(|turn| HistoryEntry::new(turn, format))
                .collect(),
        }
    }
}

/// How history entries are labelled on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryFormat {
    /// `{"role": "human" | "assistant", "content": ...}`
    #[default]
    Role,
    /// `{"type": "human" | "ai", "content": ...}`
    Typed,
}

impl FromStr for HistoryFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "role" => Ok(Self::Role),
            "typed" | "type" => Ok(Self::Typed),
            other => Err(format!("unknown history format `{other}` (expected `role` or `typed`)")),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InvokeBody<'a> {
    query: &'a str,
    history: Vec<HistoryEntry<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum HistoryEntry<'a> {
    Role {
        role: Role,
        content: &'a str,
    },
    Typed {
        #[serde(rename = "type")]
        kind: &'static str,
        content: &'a str,
    },
}

impl<'a> HistoryEntry<'a> {
    fn new(turn: &'a Turn, format: HistoryFormat) -> Self {
        match format {
            HistoryFormat::Role => HistoryEntry::Role {
                role: turn.role,
                content: &turn.content,
            },
            HistoryFormat::Typed => HistoryEntry::Typed {
                kind: match turn.role {
                    Role::Human => "human",
                    Role::Assistant => "ai",
                },
                content: &turn.content,
            },
        }
    }
}

/// Common interface for reaching the assistant
#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Issue the request and return the reply body once a success status
    /// has been received
    async fn invoke(&self, request: &RequestContext) -> Result<ReplyStream, TransportError>;

    /// Where requests go, for logging
    fn endpoint(&self) -> &str;
}

#[async_trait]
impl<T: AssistantClient + ?Sized> AssistantClient for Arc<T> {
    async fn invoke(&self, request: &RequestContext) -> Result<ReplyStream, TransportError> {
        (**self).invoke(request).await
    }

    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }
}

/// Logging wrapper for assistant clients
pub struct LoggingClient {
    inner: Arc<dyn AssistantClient>,
    endpoint: String,
}

impl LoggingClient {
    pub fn new(inner: Arc<dyn AssistantClient>) -> Self {
        let endpoint = inner.endpoint().to_string();
        Self { inner, endpoint }
    }
}

#[async_trait]
impl AssistantClient for LoggingClient {
    async fn invoke(&self, request: &RequestContext) -> Result<ReplyStream, TransportError> {
        let start = std::time::Instant::now();
        let result = self.inner.invoke(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(_) => {
                tracing::info!(
                    endpoint = %self.endpoint,
                    duration_ms = %duration.as_millis(),
                    history_len = request.history.len(),
                    "Assistant request accepted"
                );
            }
            Err(e) => {
                tracing::error!(
                    endpoint = %self.endpoint,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = ?e.kind,
                    retryable = e.kind.is_retryable(),
                    "Assistant request failed"
                );
            }
        }

        result
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
