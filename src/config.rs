//! Runtime configuration read from the environment

use crate::client::HistoryFormat;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_INVOKE_PATH: &str = "/invoke";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
const DEFAULT_GREETING: &str = "Hello! I'm your personal assistant. How can I help you today?";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a whole number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
    #[error("{var}: {message}")]
    InvalidHistoryFormat { var: &'static str, message: String },
}

/// Settings for a chat session
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Backend base URL, e.g. `http://127.0.0.1:8000`
    pub base_url: String,
    pub invoke_path: String,
    /// Whole-request timeout, including the streamed body
    pub timeout: Duration,
    /// Assistant turn seeded at session start
    pub greeting: Option<String>,
    pub history_format: HistoryFormat,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            invoke_path: DEFAULT_INVOKE_PATH.to_string(),
            timeout: DEFAULT_TIMEOUT,
            greeting: Some(DEFAULT_GREETING.to_string()),
            history_format: HistoryFormat::default(),
        }
    }
}

impl ChatConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup; unset variables keep defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup("ASSISTANT_URL") {
            config.base_url = url;
        }

        if let Some(path) = lookup("ASSISTANT_INVOKE_PATH") {
            config.invoke_path = path;
        }

        if let Some(value) = lookup("ASSISTANT_TIMEOUT_SECS") {
            let secs: u64 = value.trim().parse().map_err(|_| ConfigError::InvalidTimeout {
                var: "ASSISTANT_TIMEOUT_SECS",
                value: value.clone(),
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        // Set-but-empty disables the greeting
        if let Some(greeting) = lookup("ASSISTANT_GREETING") {
            let greeting = greeting.trim();
            config.greeting = (!greeting.is_empty()).then(|| greeting.to_string());
        }

        if let Some(value) = lookup("ASSISTANT_HISTORY_FORMAT") {
            config.history_format =
                value
                    .parse()
                    .map_err(|message| ConfigError::InvalidHistoryFormat {
                        var: "ASSISTANT_HISTORY_FORMAT",
                        message,
                    })?;
        }

        Ok(config)
    }

    /// Full URL requests are posted to
    pub fn invoke_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = self.invoke_path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}
