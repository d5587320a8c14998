//! CLI response types returned as JSON by `cadence` commands.
//!
//! These structs define the shape of JSON output for `cadence run`,
//! `cadence parse` and `cadence next`.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What happened to one completed recurring task during a run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// A successor was created (or would have been, in a dry run).
    Created {
        /// Identifier of the new task; `None` in a dry run.
        task_id: Option<String>,
        due_date: DateTime<Utc>,
    },
    /// An open task with the same name already exists.
    SkippedDuplicate,
    /// Parsing, date computation or creation failed for this task.
    Failed { reason: String },
}

/// Per-task line of a [`RunReport`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TaskReport {
    pub name: String,
    pub source_id: String,
    pub schedule: Option<String>,
    #[serde(flatten)]
    pub outcome: TaskOutcome,
}

/// Response from `cadence run`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RunReport {
    /// Checkpoint the run started from.
    pub checkpoint: DateTime<Utc>,
    /// Start time of this run; becomes the next checkpoint.
    pub run_at: DateTime<Utc>,
    pub dry_run: bool,
    /// Distinct completed recurring tasks found since the checkpoint.
    pub found: u32,
    pub created: u32,
    pub skipped_duplicate: u32,
    pub failed: u32,
    pub tasks: Vec<TaskReport>,
}

impl RunReport {
    /// Tally the outcomes into a report.
    #[must_use]
    pub fn from_outcomes(
        checkpoint: DateTime<Utc>,
        run_at: DateTime<Utc>,
        dry_run: bool,
        tasks: Vec<TaskReport>,
    ) -> Self {
        let count = |pred: fn(&TaskOutcome) -> bool| {
            u32::try_from(tasks.iter().filter(|t| pred(&t.outcome)).count()).unwrap_or(u32::MAX)
        };
        Self {
            checkpoint,
            run_at,
            dry_run,
            found: u32::try_from(tasks.len()).unwrap_or(u32::MAX),
            created: count(|o| matches!(o, TaskOutcome::Created { .. })),
            skipped_duplicate: count(|o| matches!(o, TaskOutcome::SkippedDuplicate)),
            failed: count(|o| matches!(o, TaskOutcome::Failed { .. })),
            tasks,
        }
    }
}

/// Response from `cadence parse`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ScheduleDescription {
    pub input: String,
    /// `cron` or `interval`.
    pub kind: String,
    /// Canonical form that re-parses to the same schedule.
    pub canonical: String,
    /// Zone the schedule is evaluated in (`+05:30`, `Europe/Paris`, `local`).
    pub timezone: String,
    pub expression: Option<String>,
    pub count: Option<u32>,
    pub unit: Option<String>,
    /// Weekdays, 0 = Sunday … 6 = Saturday.
    pub weekdays: Vec<u8>,
    pub days_of_month: Vec<u8>,
    pub last_day_of_month: bool,
    pub time_of_day: Option<String>,
    pub anchor_field: Option<String>,
}

/// Response from `cadence next`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NextOccurrencesResponse {
    pub schedule: String,
    pub from: DateTime<Utc>,
    pub occurrences: Vec<DateTime<Utc>>,
}
