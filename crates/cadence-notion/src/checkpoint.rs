//! Run checkpoints stored as pages in the executions database.
//!
//! Each completed run adds a page titled `Execution ts: <rfc3339>`. The newest
//! page by creation time is the checkpoint. The title carries the exact run
//! start; the page's `created_time` is only a fallback because Notion stamps
//! it after the run and rounds it to the minute.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Value, json};

use crate::NotionClient;
use crate::error::NotionError;
use crate::properties::{NAME, Page, PropertyValue, QueryResponse, joined};

const TITLE_PREFIX: &str = "Execution ts: ";

impl NotionClient {
    /// Start time of the most recent recorded run.
    ///
    /// # Errors
    ///
    /// Returns [`NotionError`] if the executions database cannot be queried.
    pub async fn last_execution(&self) -> Result<Option<DateTime<Utc>>, NotionError> {
        let body = json!({
            "sorts": [{ "timestamp": "created_time", "direction": "descending" }],
            "page_size": 1,
        });
        let path = format!("databases/{}/query", self.executions_db_id);
        let response: QueryResponse =
            self.send_json(reqwest::Method::POST, &path, &body).await?;

        Ok(response.results.first().map(execution_time))
    }

    /// Record a completed run that started at `at`.
    ///
    /// # Errors
    ///
    /// Returns [`NotionError`] once retries are exhausted.
    pub async fn record_execution(&self, at: DateTime<Utc>) -> Result<(), NotionError> {
        let properties = json!({ NAME: execution_title(at) });
        let page = self.create_page(&self.executions_db_id, &properties).await?;
        tracing::debug!(page_id = %page.id, %at, "recorded execution");
        Ok(())
    }
}

fn execution_title(at: DateTime<Utc>) -> Value {
    let title = format!(
        "{TITLE_PREFIX}{}",
        at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    );
    json!({ "type": "title", "title": [{ "text": { "content": title } }] })
}

/// Run time encoded in an execution page, falling back to its creation time.
fn execution_time(page: &Page) -> DateTime<Utc> {
    let from_title = match page.properties.get(NAME) {
        Some(PropertyValue::Title { title }) => {
            joined(title)
                .strip_prefix(TITLE_PREFIX)
                .and_then(|ts| DateTime::parse_from_rfc3339(ts.trim()).ok())
                .map(|ts| ts.with_timezone(&Utc))
        }
        _ => None,
    };

    from_title.unwrap_or_else(|| {
        tracing::warn!(page_id = %page.id, "execution title has no timestamp; using created_time");
        page.created_time
    })
}
