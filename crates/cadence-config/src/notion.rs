//! Notion API configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_api_url() -> String {
    "https://api.notion.com/v1".to_string()
}

fn default_notion_version() -> String {
    "2022-06-28".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_retry_base_delay_ms() -> u64 {
    500
}

const fn default_page_size() -> u32 {
    100
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotionConfig {
    /// Integration token (`secret_…` / `ntn_…`).
    #[serde(default)]
    pub api_key: String,

    /// Database holding the tasks.
    #[serde(default)]
    pub tasks_db_id: String,

    /// Database holding one page per completed run (the checkpoint log).
    #[serde(default)]
    pub executions_db_id: String,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Value of the `Notion-Version` header.
    #[serde(default = "default_notion_version")]
    pub notion_version: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries after the first attempt for transport errors, 429 and 5xx.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// First backoff delay; doubles on each retry.
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// Results requested per query page (Notion caps this at 100).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            tasks_db_id: String::new(),
            executions_db_id: String::new(),
            api_url: default_api_url(),
            notion_version: default_notion_version(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            page_size: default_page_size(),
        }
    }
}

impl NotionConfig {
    /// Check if the token and both database IDs are present.
    pub fn is_configured(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Names of required fields that are still empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("api_key", &self.api_key),
            ("tasks_db_id", &self.tasks_db_id),
            ("executions_db_id", &self.executions_db_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Return `self` if configured, otherwise a [`ConfigError::NotConfigured`].
    ///
    /// # Errors
    ///
    /// Fails when any of the required fields is empty.
    pub fn require(&self) -> Result<&Self, ConfigError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::NotConfigured {
                section: "notion".into(),
                missing: missing.join(", "),
            })
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.page_size) {
            return Err(ConfigError::InvalidValue {
                field: "notion.page_size".into(),
                reason: format!("{} is outside 1..=100", self.page_size),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "notion.timeout_secs".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = NotionConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.api_url, "https://api.notion.com/v1");
        assert_eq!(config.notion_version, "2022-06-28");
        assert_eq!(config.max_retries, 3);
        assert_eq!(
            config.missing_fields(),
            vec!["api_key", "tasks_db_id", "executions_db_id"]
        );
    }

    #[test]
    fn require_names_missing_fields() {
        let config = NotionConfig {
            api_key: "secret_abc".into(),
            tasks_db_id: "tasks".into(),
            ..Default::default()
        };
        let err = config.require().unwrap_err();
        assert!(err.to_string().contains("executions_db_id"));
    }

    #[test]
    fn configured_when_all_required_fields_set() {
        let config = NotionConfig {
            api_key: "secret_abc".into(),
            tasks_db_id: "tasks".into(),
            executions_db_id: "runs".into(),
            ..Default::default()
        };
        assert!(config.require().is_ok());
    }

    #[test]
    fn page_size_is_bounded() {
        let config = NotionConfig {
            page_size: 500,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
