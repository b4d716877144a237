//! Transport error types

use thiserror::Error;

/// Failure to obtain or read a reply from the assistant endpoint
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connect, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, message)
    }

    pub fn read(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Read, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Unknown, message)
    }

    /// Non-success HTTP status; `body` is whatever the server sent back
    pub fn status(code: u16, body: &str) -> Self {
        let body = body.trim();
        let message = if body.is_empty() {
            format!("HTTP {code}")
        } else {
            format!("HTTP {code}: {body}")
        };
        Self::new(TransportErrorKind::Status(code), message)
    }

    pub(crate) fn from_reqwest(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::timeout(format!("Request timeout: {e}"))
        } else if e.is_connect() {
            Self::connect(format!("Connection failed: {e}"))
        } else if e.is_body() || e.is_decode() {
            Self::read(format!("Failed to read response: {e}"))
        } else {
            Self::unknown(format!("Request failed: {e}"))
        }
    }
}

/// Error classification, used for logging and by callers deciding on retries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Could not connect to the endpoint
    Connect,
    /// The request exceeded the configured timeout
    Timeout,
    /// The endpoint answered with a non-success status
    Status(u16),
    /// The body stream broke off mid-reply
    Read,
    Unknown,
}

impl TransportErrorKind {
    pub fn is_retryable(self) -> bool {
        match self {
            Self::Connect | Self::Timeout | Self::Read => true,
            Self::Status(code) => code == 429 || code >= 500,
            Self::Unknown => false,
        }
    }
}
