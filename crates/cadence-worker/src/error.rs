//! Worker error types.

use cadence_core::StoreError;
use cadence_schedule::ScheduleError;
use thiserror::Error;

/// Errors that abort a run. Per-task failures never surface here.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The checkpoint could not be read or advanced.
    #[error("checkpoint error: {0}")]
    Checkpoint(#[source] StoreError),

    /// Completed tasks could not be fetched.
    #[error("failed to fetch completed tasks: {0}")]
    Fetch(#[source] StoreError),
}

/// Failure while processing a single task; reported as a failed outcome.
#[derive(Debug, Error)]
pub(crate) enum TaskError {
    #[error("task has no schedule")]
    MissingSchedule,

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("duplicate check failed: {0}")]
    DuplicateCheck(#[source] StoreError),

    #[error("create failed: {0}")]
    Create(#[source] StoreError),
}
