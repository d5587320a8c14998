//! Schedule evaluation settings.

use cadence_core::Zone;
use cadence_core::enums::AnchorPolicy;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScheduleConfig {
    /// Zone for calendar arithmetic: an IANA name (`America/New_York`), a
    /// fixed offset (`+05:30`, `UTC`), or empty for the host's zone.
    #[serde(default)]
    pub timezone: String,

    /// Which task timestamp seeds the next occurrence when the schedule
    /// string has no `from` clause.
    #[serde(default)]
    pub default_anchor: AnchorPolicy,
}

impl ScheduleConfig {
    /// Resolve [`timezone`](Self::timezone).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for unknown zones.
    pub fn zone(&self) -> Result<Zone, ConfigError> {
        parse_zone(&self.timezone)
    }
}

/// Parse a zone setting. See [`Zone`]'s `FromStr` for the accepted forms.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] when `raw` names no zone.
pub fn parse_zone(raw: &str) -> Result<Zone, ConfigError> {
    raw.parse::<Zone>().map_err(|e| ConfigError::InvalidValue {
        field: "schedule.timezone".into(),
        reason: e.to_string(),
    })
}
