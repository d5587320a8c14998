//! The recurrence run.
//!
//! One run loads the checkpoint, fetches recurring tasks completed since
//! then, keeps the most recent task per name, and creates each task's next
//! occurrence unless an open task with that name already exists. The
//! checkpoint advances only after every task has an outcome, so an
//! interrupted run is re-evaluated in full next time and the duplicate check
//! keeps that re-evaluation from creating anything twice.

use std::collections::HashSet;

use cadence_config::{CadenceConfig, ConfigError};
use cadence_core::enums::AnchorPolicy;
use cadence_core::responses::{RunReport, TaskOutcome, TaskReport};
use cadence_core::{NewTask, Task, TaskFilter, TaskStore, Zone};
use cadence_schedule::{Schedule, ScheduleParser, next_occurrence, next_occurrence_after};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};

use crate::error::{TaskError, WorkerError};

/// Knobs for a run, usually built from [`CadenceConfig`].
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// Zone for schedule arithmetic.
    pub timezone: Zone,
    /// Anchor used when a schedule has no `from` clause.
    pub default_anchor: AnchorPolicy,
    /// Tasks processed at once.
    pub concurrency: usize,
    /// Skip occurrences already behind the run time.
    pub catch_up: bool,
    /// Report what would be created without writing anything.
    pub dry_run: bool,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            timezone: Zone::utc(),
            default_anchor: AnchorPolicy::Auto,
            concurrency: 4,
            catch_up: true,
            dry_run: false,
        }
    }
}

impl WorkerSettings {
    /// Settings from the `[schedule]` and `[worker]` sections.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the time zone is unknown.
    pub fn from_config(config: &CadenceConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            timezone: config.schedule.zone()?,
            default_anchor: config.schedule.default_anchor,
            concurrency: config.worker.concurrency,
            catch_up: config.worker.catch_up,
            dry_run: config.worker.dry_run,
        })
    }
}

/// Drives recurrence runs against a [`TaskStore`].
pub struct RecurrenceWorker<S> {
    store: S,
    settings: WorkerSettings,
    parser: ScheduleParser,
}

impl<S: TaskStore> RecurrenceWorker<S> {
    pub fn new(store: S, settings: WorkerSettings) -> Self {
        let parser = ScheduleParser::new(settings.timezone);
        Self {
            store,
            settings,
            parser,
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn settings(&self) -> &WorkerSettings {
        &self.settings
    }

    /// Run once as of the current time.
    ///
    /// # Errors
    ///
    /// See [`Self::run_at`].
    pub async fn run(&self) -> Result<RunReport, WorkerError> {
        self.run_at(Utc::now()).await
    }

    /// Run once as of `now`. `now` becomes the new checkpoint.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Checkpoint`] if the checkpoint cannot be read or
    /// advanced and [`WorkerError::Fetch`] if completed tasks cannot be
    /// fetched. Failures of individual tasks are reported in the
    /// [`RunReport`] instead.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<RunReport, WorkerError> {
        let checkpoint = self
            .store
            .read_checkpoint()
            .await
            .map_err(WorkerError::Checkpoint)?
            .unwrap_or(DateTime::UNIX_EPOCH);
        tracing::info!(%checkpoint, run_at = %now, dry_run = self.settings.dry_run, "starting recurrence run");

        let completed = self
            .store
            .query_tasks(&TaskFilter::completed_recurring_since(checkpoint))
            .await
            .map_err(WorkerError::Fetch)?;
        let fetched = completed.len();
        let tasks = latest_per_name(completed);
        tracing::info!(fetched, unique = tasks.len(), "found completed recurring tasks");

        let mut indexed: Vec<(usize, TaskReport)> = stream::iter(tasks.iter().enumerate())
            .map(|(index, task)| async move { (index, self.process(task, now).await) })
            .buffer_unordered(self.settings.concurrency.max(1))
            .collect()
            .await;
        indexed.sort_by_key(|(index, _)| *index);
        let reports = indexed.into_iter().map(|(_, report)| report).collect();

        if self.settings.dry_run {
            tracing::info!("dry run; checkpoint left at {checkpoint}");
        } else {
            self.store
                .write_checkpoint(now)
                .await
                .map_err(WorkerError::Checkpoint)?;
            tracing::info!(checkpoint = %now, "advanced checkpoint");
        }

        let report = RunReport::from_outcomes(checkpoint, now, self.settings.dry_run, reports);
        tracing::info!(
            found = report.found,
            created = report.created,
            skipped_duplicate = report.skipped_duplicate,
            failed = report.failed,
            "recurrence run complete"
        );
        Ok(report)
    }

    async fn process(&self, task: &Task, now: DateTime<Utc>) -> TaskReport {
        let outcome = match self.create_successor(task, now).await {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::error!(
                    task = %task.name,
                    task_id = %task.id,
                    schedule = task.schedule.as_deref().unwrap_or_default(),
                    %error,
                    "failed to create next occurrence"
                );
                TaskOutcome::Failed {
                    reason: error.to_string(),
                }
            }
        };

        TaskReport {
            name: task.name.clone(),
            source_id: task.id.clone(),
            schedule: task.schedule.clone(),
            outcome,
        }
    }

    async fn create_successor(
        &self,
        task: &Task,
        now: DateTime<Utc>,
    ) -> Result<TaskOutcome, TaskError> {
        let raw = task.schedule_str().ok_or(TaskError::MissingSchedule)?;
        let schedule = self.parser.parse(raw)?;
        let due = self.next_due(task, &schedule, now)?;

        let open = self
            .store
            .first_task_id(&TaskFilter::open_by_name(&task.name))
            .await
            .map_err(TaskError::DuplicateCheck)?;
        if let Some(open_task_id) = open {
            tracing::info!(task = %task.name, %open_task_id, "open task with same name exists; skipping");
            return Ok(TaskOutcome::SkippedDuplicate);
        }

        if self.settings.dry_run {
            tracing::info!(task = %task.name, schedule = raw, due = %due, "would create next occurrence");
            return Ok(TaskOutcome::Created {
                task_id: None,
                due_date: due,
            });
        }

        let created = self
            .store
            .create_task(&NewTask::successor_of(task, due))
            .await
            .map_err(TaskError::Create)?;
        tracing::info!(
            task = %task.name,
            schedule = raw,
            due = %due,
            previous_due = ?task.due_date,
            new_task_id = %created.id,
            "created next occurrence"
        );
        Ok(TaskOutcome::Created {
            task_id: Some(created.id),
            due_date: due,
        })
    }

    fn next_due(
        &self,
        task: &Task,
        schedule: &Schedule,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, TaskError> {
        let field = schedule
            .anchor_field()
            .unwrap_or_else(|| self.settings.default_anchor.resolve(schedule.selects_days()));
        let anchor = task.anchor(field).unwrap_or_else(|| {
            let fallback = task.completed_at().unwrap_or(task.last_edited_at);
            tracing::info!(task = %task.name, anchor = %field, %fallback, "task has no {field}; anchoring on completion time");
            fallback
        });

        let due = if self.settings.catch_up {
            next_occurrence_after(schedule, anchor, now)?
        } else {
            next_occurrence(schedule, anchor)?
        };
        Ok(due)
    }
}

/// Keep the first task seen per name. Input is most recently edited first.
fn latest_per_name(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::new();
    tasks
        .into_iter()
        .filter(|task| seen.insert(task.name.clone()))
        .collect()
}
