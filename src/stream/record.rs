//! Frame payloads and display states

use super::DATA_PREFIX;
use serde::Deserialize;
use serde_json::error::Category;
use thiserror::Error;

const PREVIEW_CHARS: usize = 40;

/// A parsed frame: either the full answer so far or a backend error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamRecord {
    Content(String),
    Error(String),
}

/// Why a single frame could not be turned into a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("frame does not start with `data:`: {preview:?}")]
    MissingPrefix { preview: String },
    #[error("frame payload is not valid JSON: {message}")]
    InvalidJson { message: String },
    #[error("frame payload has an unexpected shape: {message}")]
    UnexpectedShape { message: String },
}

/// Result of parsing one complete frame
pub type FrameOutcome = Result<StreamRecord, DecodeError>;

/// What the renderer should currently show for a pending reply.
///
/// Each new state replaces the previous one outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayState {
    Content(String),
    /// Error text sent by the backend, or a fixed local failure message
    Error(String),
    /// Placeholder for a frame that could not be decoded
    DecodeFailed(String),
}

impl DisplayState {
    pub fn text(&self) -> &str {
        match self {
            DisplayState::Content(text)
            | DisplayState::Error(text)
            | DisplayState::DecodeFailed(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, DisplayState::Content(_))
    }
}

impl From<StreamRecord> for DisplayState {
    fn from(record: StreamRecord) -> Self {
        match record {
            StreamRecord::Content(text) => DisplayState::Content(text),
            StreamRecord::Error(text) => DisplayState::Error(text),
        }
    }
}

impl From<&DecodeError> for DisplayState {
    fn from(err: &DecodeError) -> Self {
        DisplayState::DecodeFailed(format!(
            "Received an unreadable update from the assistant ({err})"
        ))
    }
}

impl From<FrameOutcome> for DisplayState {
    fn from(outcome: FrameOutcome) -> Self {
        match outcome {
            Ok(record) => record.into(),
            Err(err) => (&err).into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WirePayload {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Parse one complete frame.
///
/// Returns `None` for whitespace-only frames (keep-alive padding).
pub fn parse_frame(frame: &str) -> Option<FrameOutcome> {
    let frame = frame.trim();
    if frame.is_empty() {
        return None;
    }

    let Some(payload) = frame.strip_prefix(DATA_PREFIX) else {
        return Some(Err(DecodeError::MissingPrefix {
            preview: frame.chars().take(PREVIEW_CHARS).collect(),
        }));
    };

    Some(parse_payload(payload))
}

fn parse_payload(payload: &str) -> FrameOutcome {
    let wire: WirePayload = serde_json::from_str(payload).map_err(|e| match e.classify() {
        Category::Data => DecodeError::UnexpectedShape {
            message: e.to_string(),
        },
        Category::Io | Category::Syntax | Category::Eof => DecodeError::InvalidJson {
            message: e.to_string(),
        },
    })?;

    match (wire.content, wire.error) {
        (Some(content), None) => Ok(StreamRecord::Content(content)),
        (None, Some(error)) => Ok(StreamRecord::Error(error)),
        (Some(_), Some(_)) => Err(DecodeError::UnexpectedShape {
            message: "payload carries both `content` and `error`".to_string(),
        }),
        (None, None) => Err(DecodeError::UnexpectedShape {
            message: "payload carries neither `content` nor `error`".to_string(),
        }),
    }
}
