//! # cadence-worker
//!
//! Checkpointed recurrence orchestrator.
//!
//! [`RecurrenceWorker`] turns completed recurring tasks into their next
//! occurrences through any [`cadence_core::TaskStore`]. [`memory::MemoryStore`]
//! is an in-process store for tests and dry experiments.

mod error;
pub mod memory;
mod worker;

pub use error::WorkerError;
pub use worker::{RecurrenceWorker, WorkerSettings};
