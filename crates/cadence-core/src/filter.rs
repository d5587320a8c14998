//! AND-composable task query filters.
//!
//! A [`TaskFilter`] is a conjunction of [`Predicate`]s over a small set of
//! typed task fields. Store implementations translate it into their own query
//! language; [`TaskFilter::matches`] is the reference evaluation used by
//! in-memory stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Task;

/// Text-valued task fields that can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    Name,
    Schedule,
}

/// Boolean task fields that can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckboxField {
    Done,
}

/// A single filter condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// Last edit time is on or after the timestamp.
    EditedOnOrAfter { at: DateTime<Utc> },
    /// Text field is present and not blank.
    TextNotEmpty { field: TextField },
    /// Text field equals the value exactly.
    TextEquals { field: TextField, value: String },
    /// Checkbox field equals the value.
    CheckboxEquals { field: CheckboxField, value: bool },
}

impl Predicate {
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::EditedOnOrAfter { at } => task.last_edited_at >= *at,
            Self::TextNotEmpty { field } => {
                text_value(task, *field).is_some_and(|v| !v.trim().is_empty())
            }
            Self::TextEquals { field, value } => text_value(task, *field) == Some(value.as_str()),
            Self::CheckboxEquals { field, value } => match field {
                CheckboxField::Done => task.done == *value,
            },
        }
    }
}

fn text_value(task: &Task, field: TextField) -> Option<&str> {
    match field {
        TextField::Name => Some(task.name.as_str()),
        TextField::Schedule => task.schedule.as_deref(),
    }
}

/// Conjunction of predicates. An empty filter matches every task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilter {
    pub predicates: Vec<Predicate>,
}

impl TaskFilter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }

    #[must_use]
    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Recurring tasks (non-empty schedule) marked done and edited since `since`.
    #[must_use]
    pub fn completed_recurring_since(since: DateTime<Utc>) -> Self {
        Self::new()
            .and(Predicate::EditedOnOrAfter { at: since })
            .and(Predicate::TextNotEmpty {
                field: TextField::Schedule,
            })
            .and(Predicate::CheckboxEquals {
                field: CheckboxField::Done,
                value: true,
            })
    }

    /// Open (not done) tasks with exactly this name.
    #[must_use]
    pub fn open_by_name(name: &str) -> Self {
        Self::new()
            .and(Predicate::TextEquals {
                field: TextField::Name,
                value: name.to_string(),
            })
            .and(Predicate::CheckboxEquals {
                field: CheckboxField::Done,
                value: false,
            })
    }

    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.predicates.iter().all(|p| p.matches(task))
    }
}
