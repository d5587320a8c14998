//! The task-store contract the recurrence worker drives.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{NewTask, Task};
use crate::errors::StoreError;
use crate::filter::TaskFilter;

/// Narrow view of the external task tracker.
///
/// Implementations apply their own timeout and retry policy; an `Err` means
/// the operation is given up on.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Tasks matching `filter`, most recently edited first.
    async fn query_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError>;

    /// Id of any record matching `filter`.
    ///
    /// Unlike [`query_tasks`](Self::query_tasks) this must count records that
    /// exist but cannot be decoded into a [`Task`], so an existence check never
    /// mistakes an unreadable record for a missing one.
    async fn first_task_id(&self, filter: &TaskFilter) -> Result<Option<String>, StoreError> {
        let tasks = self.query_tasks(filter).await?;
        Ok(tasks.into_iter().next().map(|task| task.id))
    }

    /// Insert a single task atomically and return the stored record.
    async fn create_task(&self, task: &NewTask) -> Result<Task, StoreError>;

    /// Timestamp of the last completed run, if any run was ever recorded.
    async fn read_checkpoint(&self) -> Result<Option<DateTime<Utc>>, StoreError>;

    /// Record `at` as the start of the most recent completed run.
    async fn write_checkpoint(&self, at: DateTime<Utc>) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: TaskStore + ?Sized> TaskStore for Arc<T> {
    async fn query_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        (**self).query_tasks(filter).await
    }

    async fn first_task_id(&self, filter: &TaskFilter) -> Result<Option<String>, StoreError> {
        (**self).first_task_id(filter).await
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task, StoreError> {
        (**self).create_task(task).await
    }

    async fn read_checkpoint(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        (**self).read_checkpoint().await
    }

    async fn write_checkpoint(&self, at: DateTime<Utc>) -> Result<(), StoreError> {
        (**self).write_checkpoint(at).await
    }
}
