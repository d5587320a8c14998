//! Entity structs for Cadence domain objects.
//!
//! Tasks are owned by the external tracker; Cadence only reads them and
//! appends successors. All structs derive `Serialize`, `Deserialize`, and
//! `JsonSchema` for JSON output and schema validation.

mod task;

pub use task::{NewTask, Task};
