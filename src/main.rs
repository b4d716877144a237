//! Assistant chat - terminal client for a streaming assistant endpoint
//!
//! Sends each query with the prior conversation and renders the reply as it
//! streams in.

mod client;
mod config;
mod conversation;
mod cycle;
mod session;
mod stream;
mod terminal;

use client::{HttpAssistantClient, LoggingClient};
use config::ChatConfig;
use session::ChatSession;
use std::sync::Arc;
use terminal::TerminalRenderer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    dotenv::dotenv().ok();

    // Logs go to stderr so they never interleave with the conversation
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "assistant_chat=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = ChatConfig::from_env()?;
    tracing::info!(
        url = %config.invoke_url(),
        timeout_secs = config.timeout.as_secs(),
        history_format = ?config.history_format,
        "Configuration loaded"
    );

    let client = LoggingClient::new(Arc::new(HttpAssistantClient::new(&config)?));
    let session = ChatSession::new(client, TerminalRenderer::stdout(), config.greeting);

    terminal::run(session).await?;
    Ok(())
}
