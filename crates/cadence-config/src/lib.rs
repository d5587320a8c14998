//! # cadence-config
//!
//! Layered configuration loading for Cadence using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CADENCE_*` prefix, `__` as separator)
//! 2. Legacy `NOTION_API_KEY`, `NOTION_TASKS_DB_ID`, `NOTION_EXECUTIONS_DB_ID`
//! 3. Project-level `.cadence/config.toml`
//! 4. User-level `~/.config/cadence/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `CADENCE_NOTION__API_KEY` -> `notion.api_key`,
//! `CADENCE_WORKER__CONCURRENCY` -> `worker.concurrency`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use cadence_config::CadenceConfig;
//!
//! let config = CadenceConfig::load_with_dotenv().expect("config");
//! if config.notion.is_configured() {
//!     println!("Tasks database: {}", config.notion.tasks_db_id);
//! }
//! ```

mod error;
mod notion;
mod schedule;
mod worker;

pub use error::ConfigError;
pub use notion::NotionConfig;
pub use schedule::{ScheduleConfig, parse_zone};
pub use worker::WorkerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Unprefixed variables accepted for the Notion section.
const LEGACY_NOTION_VARS: [&str; 3] = [
    "NOTION_API_KEY",
    "NOTION_TASKS_DB_ID",
    "NOTION_EXECUTIONS_DB_ID",
];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CadenceConfig {
    #[serde(default)]
    pub notion: NotionConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub worker: WorkerConfig,
}

impl CadenceConfig {
    /// Load configuration from TOML files and environment variables.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Fails on malformed sources or values that do not pass validation.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load `.env` via `dotenvy`, then [`Self::load`].
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Extract and validate a config from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests and the CLI can layer additional providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".cadence/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment
            .merge(
                Env::raw()
                    .only(&LEGACY_NOTION_VARS)
                    .map(|key| {
                        let field = key.as_str().to_ascii_lowercase();
                        format!("notion.{}", field.trim_start_matches("notion_")).into()
                    }),
            )
            .merge(Env::prefixed("CADENCE_").split("__"))
    }

    /// Check cross-field constraints figment cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.notion.validate()?;
        self.schedule.zone()?;
        self.worker.validate()
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cadence").join("config.toml"))
    }

    /// Load `.env` from the workspace root, falling back to the current dir.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
