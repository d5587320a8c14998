//! The time zone wall-clock schedule arithmetic happens in.
//!
//! A [`Zone`] is a fixed UTC offset, an IANA region (`America/New_York`) or the
//! host's local zone. Region and local zones follow daylight-saving rules, so
//! `at 9am` stays at 9am on the wall clock across transitions.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use crate::errors::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Fixed(FixedOffset),
    Named(Tz),
    /// The host's zone, with its daylight-saving rules.
    Local,
}

impl Default for Zone {
    fn default() -> Self {
        Self::utc()
    }
}

impl From<FixedOffset> for Zone {
    fn from(offset: FixedOffset) -> Self {
        Self::Fixed(offset)
    }
}

impl From<Tz> for Zone {
    fn from(tz: Tz) -> Self {
        Self::Named(tz)
    }
}

impl Zone {
    #[must_use]
    pub fn utc() -> Self {
        Self::Fixed(Utc.fix())
    }

    /// Wall-clock time of `at` in this zone.
    #[must_use]
    pub fn wall_clock(self, at: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Self::Fixed(offset) => at.with_timezone(&offset).naive_local(),
            Self::Named(tz) => at.with_timezone(&tz).naive_local(),
            Self::Local => at.with_timezone(&Local).naive_local(),
        }
    }

    /// UTC offset in effect at `at`.
    #[must_use]
    pub fn offset_at(self, at: DateTime<Utc>) -> FixedOffset {
        match self {
            Self::Fixed(offset) => offset,
            Self::Named(tz) => at.with_timezone(&tz).offset().fix(),
            Self::Local => at.with_timezone(&Local).offset().fix(),
        }
    }

    /// The instant a wall-clock time denotes.
    ///
    /// A repeated wall time (clocks set back) resolves to the earlier
    /// instant. A skipped wall time (clocks set forward) is read with the
    /// offset in force before the gap, which lands it after the gap by the
    /// gap's length: 02:30 on a spring-forward night becomes 03:30.
    #[must_use]
    pub fn resolve(self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Self::Fixed(offset) => resolve_in(&offset, local),
            Self::Named(tz) => resolve_in(&tz, local),
            Self::Local => resolve_in(&Local, local),
        }
    }
}

fn resolve_in<Z: TimeZone>(zone: &Z, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    if let Some(at) = zone.from_local_datetime(&local).earliest() {
        return Some(at.with_timezone(&Utc));
    }
    let before = local.checked_sub_signed(TimeDelta::days(1))?;
    let offset = zone.offset_from_local_datetime(&before).earliest()?.fix();
    let utc = local.checked_sub_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))?;
    Some(Utc.from_utc_datetime(&utc))
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(offset) => write!(f, "{offset}"),
            Self::Named(tz) => f.write_str(tz.name()),
            Self::Local => f.write_str("local"),
        }
    }
}

impl FromStr for Zone {
    type Err = CoreError;

    /// Accepts `+05:30`/`-08:00`, `UTC`/`Z`, an IANA name, or `local`/empty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("local") {
            return Ok(Self::Local);
        }
        if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
            return Ok(Self::utc());
        }
        if let Ok(offset) = raw.parse::<FixedOffset>() {
            return Ok(Self::Fixed(offset));
        }
        raw.parse::<Tz>().map(Self::Named).map_err(|_| {
            CoreError::Validation(format!(
                "'{raw}' is neither an offset like +05:30 nor a time zone name like Europe/Paris"
            ))
        })
    }
}
