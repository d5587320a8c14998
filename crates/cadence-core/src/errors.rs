//! Cross-cutting error types for Cadence.
//!
//! Domain-specific errors (`ScheduleError`, `NotionError`, `WorkerError`) are
//! defined in their respective crates. `StoreError` lives here because it is
//! part of the [`TaskStore`](crate::store::TaskStore) contract every store
//! implementation reports through.

use thiserror::Error;

/// Errors raised while parsing core values from text.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Failure reported by the external task tracker.
///
/// Store implementations retry transient failures themselves; an error that
/// reaches the caller means retries are exhausted or the failure is permanent.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The service kept rate limiting after all retries.
    #[error("rate limited; retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// A response could not be mapped onto Cadence types.
    #[error("decode error: {0}")]
    Decode(String),

    /// The store is missing required configuration.
    #[error("store not configured: {0}")]
    NotConfigured(String),
}
