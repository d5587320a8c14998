//! [`TaskStore`] implementation over the tasks and executions databases.

use async_trait::async_trait;
use cadence_core::{NewTask, StoreError, Task, TaskFilter, TaskStore};
use chrono::{DateTime, Utc};
use serde_json::json;

use crate::NotionClient;
use crate::error::NotionError;
use crate::filter::to_notion_filter;
use crate::properties::Page;

impl NotionClient {
    /// Raw tasks-database pages matching `filter`, most recently edited first.
    async fn task_pages(&self, filter: &TaskFilter) -> Result<Vec<Page>, NotionError> {
        let sorts = json!([{ "timestamp": "last_edited_time", "direction": "descending" }]);
        let notion_filter = to_notion_filter(filter);
        self.query_database(&self.tasks_db_id, notion_filter.as_ref(), &sorts)
            .await
    }
}

#[async_trait]
impl TaskStore for NotionClient {
    async fn query_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        let pages = self.task_pages(filter).await?;

        let mut tasks = Vec::with_capacity(pages.len());
        for page in &pages {
            match self.codec.decode(page) {
                Ok(task) => tasks.push(task),
                Err(error) => {
                    tracing::warn!(page_id = %page.id, %error, "skipping undecodable task page");
                }
            }
        }
        Ok(tasks)
    }

    async fn first_task_id(&self, filter: &TaskFilter) -> Result<Option<String>, StoreError> {
        let pages = self.task_pages(filter).await?;
        Ok(pages.into_iter().next().map(|page| page.id))
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task, StoreError> {
        let properties = serde_json::to_value(self.codec.encode(task))
            .map_err(|e| NotionError::Parse(e.to_string()))?;
        let page = self.create_page(&self.tasks_db_id, &properties).await?;
        tracing::debug!(page_id = %page.id, task = %task.name, "created task page");
        Ok(self.codec.decode(&page)?)
    }

    async fn read_checkpoint(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self.last_execution().await?)
    }

    async fn write_checkpoint(&self, at: DateTime<Utc>) -> Result<(), StoreError> {
        Ok(self.record_execution(at).await?)
    }
}
