//! # cadence-schedule
//!
//! Schedule grammar and next-occurrence calculator for recurring tasks.
//!
//! A schedule string such as `Every 2 weeks, on mon/thu, at 9am` parses into a
//! [`Schedule`]. Strings the interval grammar rejects are retried as cron
//! expressions. [`next_occurrence`] computes the first occurrence strictly
//! after an anchor instant, doing calendar arithmetic on the wall clock of the
//! schedule's [`Zone`].

mod calendar;
pub mod error;
mod next;
mod parser;
pub mod types;

pub use cadence_core::Zone;
pub use error::ScheduleError;
pub use next::{next_occurrence, next_occurrence_after};
pub use parser::{ScheduleParser, parse};
pub use types::{CronSchedule, DaySelection, IntervalSchedule, Schedule, Unit, WEEKDAY_ABBREVIATIONS};
