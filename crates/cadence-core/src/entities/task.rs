use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AnchorField, Priority, TaskStatus};

/// A task record as read from the external tracker.
///
/// `parent_id` points at the task this one was spawned from. Successors form a
/// forward chain of creations; the chain is stored, never traversed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub done: bool,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub tags: Vec<String>,
    pub schedule: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub parent_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_edited_at: DateTime<Utc>,
}

impl Task {
    /// Completion time of a done task.
    ///
    /// The tracker has no dedicated completion field, so the last edit time of
    /// a done task stands in for it.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        if self.done {
            Some(self.last_edited_at)
        } else {
            None
        }
    }

    /// Timestamp for the requested anchor field, if the task carries it.
    #[must_use]
    pub const fn anchor(&self, field: AnchorField) -> Option<DateTime<Utc>> {
        match field {
            AnchorField::DueDate => self.due_date,
            AnchorField::CompletedDate => self.completed_at(),
        }
    }

    /// The schedule string, if present and not blank.
    #[must_use]
    pub fn schedule_str(&self) -> Option<&str> {
        self.schedule
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Field set for inserting a task.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub done: bool,
    pub status: TaskStatus,
    pub priority: Option<Priority>,
    pub tags: Vec<String>,
    pub schedule: Option<String>,
    pub due_date: DateTime<Utc>,
    pub parent_id: Option<String>,
}

impl NewTask {
    /// Build the next occurrence of `source`, due at `due_date`.
    ///
    /// Stable fields (name, priority, tags, schedule) are copied; the successor
    /// starts open in `To do` and links back to `source`.
    #[must_use]
    pub fn successor_of(source: &Task, due_date: DateTime<Utc>) -> Self {
        Self {
            name: source.name.clone(),
            done: false,
            status: TaskStatus::ToDo,
            priority: source.priority,
            tags: source.tags.clone(),
            schedule: source.schedule.clone(),
            due_date,
            parent_id: Some(source.id.clone()),
        }
    }
}
