//! Status, priority and anchor enums for Cadence.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! `TaskStatus` and `Priority` additionally expose the display labels used by the
//! task tracker's select properties (`label()` / `from_label()`).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

/// Workflow status of a task in the tracker.
///
/// ```text
/// to_do → doing → done
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    ToDo,
    Doing,
    Done,
}

impl TaskStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToDo => "to_do",
            Self::Doing => "doing",
            Self::Done => "done",
        }
    }

    /// Select-option label as it appears in the tracker.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ToDo => "To do",
            Self::Doing => "Doing",
            Self::Done => "Done",
        }
    }

    /// Resolve a select-option label, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "to do" | "to_do" | "todo" => Some(Self::ToDo),
            "doing" | "in progress" => Some(Self::Doing),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Priority select option carried over to successor tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
    None,
}

impl Priority {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::None => "none",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::None => "None",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AnchorField
// ---------------------------------------------------------------------------

/// Which timestamp on a completed task seeds the next-occurrence computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnchorField {
    DueDate,
    CompletedDate,
}

impl AnchorField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DueDate => "due_date",
            Self::CompletedDate => "completed_date",
        }
    }

    /// Phrase used by the schedule grammar (`from due date`).
    #[must_use]
    pub const fn phrase(self) -> &'static str {
        match self {
            Self::DueDate => "due date",
            Self::CompletedDate => "completed date",
        }
    }
}

impl fmt::Display for AnchorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AnchorPolicy
// ---------------------------------------------------------------------------

/// Configured default for schedules that do not name an anchor themselves.
///
/// `Auto` anchors day-selecting schedules (`on mon/wed`, `on day 15`) to the
/// due date, and plain interval schedules (`Every 3 days`) to the completion
/// time.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum AnchorPolicy {
    #[default]
    Auto,
    DueDate,
    CompletedDate,
}

impl AnchorPolicy {
    /// Resolve the anchor field for a schedule.
    ///
    /// `selects_days` reports whether the schedule pins occurrences to
    /// specific weekdays or days of the month.
    #[must_use]
    pub const fn resolve(self, selects_days: bool) -> AnchorField {
        match self {
            Self::DueDate => AnchorField::DueDate,
            Self::CompletedDate => AnchorField::CompletedDate,
            Self::Auto if selects_days => AnchorField::DueDate,
            Self::Auto => AnchorField::CompletedDate,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::DueDate => "due_date",
            Self::CompletedDate => "completed_date",
        }
    }
}

impl fmt::Display for AnchorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnchorPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "due_date" | "due date" => Ok(Self::DueDate),
            "completed_date" | "completed date" => Ok(Self::CompletedDate),
            other => Err(CoreError::Validation(format!(
                "unknown anchor policy '{other}' (expected auto, due_date or completed_date)"
            ))),
        }
    }
}
