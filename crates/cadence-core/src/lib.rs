//! # cadence-core
//!
//! Core types shared by every Cadence crate.
//!
//! This crate provides:
//! - Task entities as read from and written to the external tracker
//! - Status, priority and anchor enums
//! - AND-composable task query filters
//! - The [`store::TaskStore`] contract the recurrence worker drives
//! - Cross-cutting error types
//! - [`Zone`], the time zone schedules are evaluated in
//! - CLI response types (run reports, schedule descriptions)

pub mod entities;
pub mod enums;
pub mod errors;
pub mod filter;
pub mod responses;
pub mod store;
pub mod zone;

pub use entities::{NewTask, Task};
pub use errors::{CoreError, StoreError};
pub use filter::{CheckboxField, Predicate, TaskFilter, TextField};
pub use store::TaskStore;
pub use zone::Zone;
