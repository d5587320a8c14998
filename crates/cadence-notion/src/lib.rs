//! # cadence-notion
//!
//! Notion REST client for Cadence.
//!
//! [`NotionClient`] implements [`cadence_core::TaskStore`] over two Notion
//! databases:
//! - the tasks database (queried with an AND filter, sorted by last edit time
//!   descending, paginated; successors are created with `POST /pages`)
//! - the executions database, one page per completed run, whose newest page
//!   is the checkpoint
//!
//! Transport errors, 429 and 5xx responses are retried with exponential
//! backoff before an error is reported.

mod checkpoint;
mod error;
pub mod filter;
mod http;
pub mod properties;
mod store;

pub use error::NotionError;
pub use properties::TaskCodec;

use std::time::Duration;

use cadence_config::NotionConfig;
use cadence_core::Zone;
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::http::{backoff, check_response};
use crate::properties::{Page, QueryResponse};

/// HTTP client for the tasks and executions databases.
pub struct NotionClient {
    http: reqwest::Client,
    base_url: String,
    tasks_db_id: String,
    executions_db_id: String,
    page_size: u32,
    max_retries: u32,
    retry_base_delay: Duration,
    codec: TaskCodec,
}

impl NotionClient {
    /// Build a client from the `[notion]` settings. Dates are read and
    /// written in `timezone`.
    ///
    /// # Errors
    ///
    /// Returns [`NotionError::InvalidConfig`] if the token cannot be used as a
    /// header value, or [`NotionError::Http`] if the HTTP client fails to build.
    pub fn new(config: &NotionConfig, timezone: impl Into<Zone>) -> Result<Self, NotionError> {
        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key.trim()))
            .map_err(|_| NotionError::InvalidConfig("api_key is not a valid header value".into()))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(
            "Notion-Version",
            HeaderValue::from_str(&config.notion_version).map_err(|_| {
                NotionError::InvalidConfig(format!(
                    "notion_version '{}' is not a valid header value",
                    config.notion_version
                ))
            })?,
        );

        let http = reqwest::Client::builder()
            .user_agent(concat!("cadence/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            tasks_db_id: config.tasks_db_id.clone(),
            executions_db_id: config.executions_db_id.clone(),
            page_size: config.page_size,
            max_retries: config.max_retries,
            retry_base_delay: Duration::from_millis(config.retry_base_delay_ms),
            codec: TaskCodec::new(timezone),
        })
    }

    /// Every page in `database_id` matching `filter`, following `next_cursor`.
    ///
    /// # Errors
    ///
    /// Returns [`NotionError`] once retries are exhausted for any page request.
    pub async fn query_database(
        &self,
        database_id: &str,
        filter: Option<&Value>,
        sorts: &Value,
    ) -> Result<Vec<Page>, NotionError> {
        let path = format!("databases/{database_id}/query");
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({ "sorts": sorts, "page_size": self.page_size });
            if let Some(filter) = filter {
                body["filter"] = filter.clone();
            }
            if let Some(cursor) = &cursor {
                body["start_cursor"] = json!(cursor);
            }

            let batch: QueryResponse = self.send_json(Method::POST, &path, &body).await?;
            tracing::debug!(database_id, fetched = batch.results.len(), has_more = batch.has_more, "query page");
            pages.extend(batch.results);

            match (batch.has_more, batch.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        Ok(pages)
    }

    /// Create a page in `database_id` with the given property map.
    ///
    /// # Errors
    ///
    /// Returns [`NotionError`] once retries are exhausted.
    pub async fn create_page(
        &self,
        database_id: &str,
        properties: &Value,
    ) -> Result<Page, NotionError> {
        let body = json!({
            "parent": { "database_id": database_id },
            "properties": properties,
        });
        self.send_json(Method::POST, "pages", &body).await
    }

    /// Send a JSON request, retrying transient failures.
    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &Value,
    ) -> Result<T, NotionError> {
        let url = format!("{}/{path}", self.base_url);
        let mut attempt = 0;

        loop {
            match self.try_send(method.clone(), &url, body).await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = backoff(self.retry_base_delay, attempt, &error);
                    tracing::warn!(%url, attempt, delay_ms = delay.as_millis(), %error, "retrying Notion request");
                    tokio::time::sleep(delay).await;
                }
                Err(error) => return Err(error),
            }
        }
    }

    async fn try_send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: &Value,
    ) -> Result<T, NotionError> {
        let resp = check_response(self.http.request(method, url).json(body).send().await?).await?;
        Ok(resp.json().await?)
    }
}
