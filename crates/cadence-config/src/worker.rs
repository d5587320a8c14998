//! Recurrence run settings.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default number of tasks processed at once.
const fn default_concurrency() -> usize {
    4
}

const fn default_catch_up() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkerConfig {
    /// Tasks processed concurrently within one run.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Skip past occurrences that are already behind the run time.
    #[serde(default = "default_catch_up")]
    pub catch_up: bool,

    /// Compute successors without creating them or advancing the checkpoint.
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            catch_up: default_catch_up(),
            dry_run: false,
        }
    }
}

impl WorkerConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "worker.concurrency".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
