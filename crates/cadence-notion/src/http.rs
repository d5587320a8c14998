//! Shared HTTP response checks and retry backoff.
//!
//! Status handling lives here so the client methods only build requests and
//! map bodies: 429 becomes [`NotionError::RateLimited`] (honouring
//! `Retry-After`, 60 s when absent) and any other non-success status becomes
//! [`NotionError::Api`] with the response body.

use std::time::Duration;

use crate::error::NotionError;

/// Check an HTTP response for error statuses.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, NotionError> {
    if resp.status() == 429 {
        return Err(NotionError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !resp.status().is_success() {
        return Err(NotionError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(60)
}

/// Delay before retry number `attempt` (1-based).
///
/// Exponential from `base`; a rate limit waits at least as long as the
/// server asked.
pub fn backoff(base: Duration, attempt: u32, error: &NotionError) -> Duration {
    let exponential = base.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)));
    match error {
        NotionError::RateLimited { retry_after_secs } => {
            exponential.max(Duration::from_secs(*retry_after_secs))
        }
        _ => exponential,
    }
}
