//! Parsed schedule values.
//!
//! A [`Schedule`] is either a cron expression or an interval rule. Interval
//! rules carry at most one [`DaySelection`], so a weekday selection and a
//! day-of-month selection cannot coexist.

use std::collections::BTreeSet;
use std::fmt;

use cadence_core::Zone;
use cadence_core::enums::AnchorField;
use chrono::{NaiveTime, Timelike};

/// Three-letter weekday names indexed by weekday number (0 = Sunday).
pub const WEEKDAY_ABBREVIATIONS: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

/// Calendar unit an interval steps by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which days within a cycle an interval lands on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DaySelection {
    /// No selection; the calendar step alone decides the date.
    #[default]
    Any,
    /// Weekday numbers, 0 = Sunday … 6 = Saturday. Weekly units only.
    Weekdays(BTreeSet<u8>),
    /// Days of the month, 1–31. Monthly units only.
    DaysOfMonth(BTreeSet<u8>),
    /// The final day of each month. Monthly units only.
    LastDayOfMonth,
}

impl DaySelection {
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

/// A cron expression evaluated in a time zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronSchedule {
    pub expression: String,
    pub timezone: Zone,
}

/// An interval rule (`Every 2 weeks, on mon/thu, at 9am`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalSchedule {
    pub count: u32,
    pub unit: Unit,
    pub selection: DaySelection,
    /// Local time the occurrence lands on; `None` keeps the anchor's time.
    pub time_of_day: Option<NaiveTime>,
    /// Anchor named by a `from …` clause.
    pub anchor_field: Option<AnchorField>,
    /// Zone used for calendar arithmetic and `time_of_day`.
    pub timezone: Zone,
}

/// A parsed recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    Cron(CronSchedule),
    Interval(IntervalSchedule),
}

impl Schedule {
    #[must_use]
    pub const fn timezone(&self) -> Zone {
        match self {
            Self::Cron(cron) => cron.timezone,
            Self::Interval(interval) => interval.timezone,
        }
    }

    /// Anchor named by the schedule itself, if any.
    #[must_use]
    pub const fn anchor_field(&self) -> Option<AnchorField> {
        match self {
            Self::Cron(_) => None,
            Self::Interval(interval) => interval.anchor_field,
        }
    }

    /// Whether occurrences are pinned to particular days.
    ///
    /// Cron expressions always pin their own fields, so they count as
    /// selecting days.
    #[must_use]
    pub const fn selects_days(&self) -> bool {
        match self {
            Self::Cron(_) => true,
            Self::Interval(interval) => !interval.selection.is_any(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Cron(_) => "cron",
            Self::Interval(_) => "interval",
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cron(cron) => f.write_str(&cron.expression),
            Self::Interval(interval) => interval.fmt(f),
        }
    }
}

impl fmt::Display for IntervalSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Every {} {}s", self.count, self.unit)?;
        match &self.selection {
            DaySelection::Any => {}
            DaySelection::Weekdays(days) => {
                let names: Vec<&str> = days
                    .iter()
                    .map(|d| WEEKDAY_ABBREVIATIONS[usize::from(*d % 7)])
                    .collect();
                write!(f, ", on {}", names.join("/"))?;
            }
            DaySelection::DaysOfMonth(days) => {
                let numbers: Vec<String> = days.iter().map(u8::to_string).collect();
                write!(f, ", on day {}", numbers.join("/"))?;
            }
            DaySelection::LastDayOfMonth => f.write_str(", on the last day")?,
        }
        if let Some(time) = self.time_of_day {
            if time.second() == 0 {
                write!(f, ", at {}", time.format("%H:%M"))?;
            } else {
                write!(f, ", at {}", time.format("%H:%M:%S"))?;
            }
        }
        if let Some(anchor) = self.anchor_field {
            write!(f, ", from {}", anchor.phrase())?;
        }
        Ok(())
    }
}
