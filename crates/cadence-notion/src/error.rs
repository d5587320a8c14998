//! Notion client error types.

use cadence_core::StoreError;
use thiserror::Error;

/// Errors that can occur when talking to the Notion API.
#[derive(Debug, Error)]
pub enum NotionError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Notion returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by Notion.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// Notion returned 429 Too Many Requests.
    #[error("rate limited; retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// A page or property could not be mapped onto task fields.
    #[error("parse error: {0}")]
    Parse(String),

    /// The client cannot be built from the given settings.
    #[error("invalid client settings: {0}")]
    InvalidConfig(String),
}

impl NotionError {
    /// Whether a retry could plausibly succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => !e.is_builder() && !e.is_decode(),
            Self::RateLimited { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Parse(_) | Self::InvalidConfig(_) => false,
        }
    }
}

impl From<NotionError> for StoreError {
    fn from(error: NotionError) -> Self {
        match error {
            NotionError::Http(e) if e.is_decode() => Self::Decode(e.to_string()),
            NotionError::Http(e) => Self::Transport(e.to_string()),
            NotionError::Api { status, message } => Self::Api { status, message },
            NotionError::RateLimited { retry_after_secs } => Self::RateLimited { retry_after_secs },
            NotionError::Parse(message) => Self::Decode(message),
            NotionError::InvalidConfig(message) => Self::NotConfigured(message),
        }
    }
}
