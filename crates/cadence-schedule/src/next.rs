//! Next-occurrence calculator.
//!
//! Interval rules are evaluated on the anchor's wall-clock date in the
//! schedule's zone, so a fixed time of day survives daylight-saving changes.
//! Day-selecting rules search the anchor's own cycle (week or month) first and
//! then jump `count` cycles ahead. Every result is strictly later than the
//! anchor.

use std::collections::BTreeSet;

use cadence_core::Zone;
use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use croner::Cron;
use croner::errors::CronError;

use crate::calendar::{advance, clamped_day, last_day_of_month, month_start, week_start};
use crate::error::ScheduleError;
use crate::types::{CronSchedule, DaySelection, IntervalSchedule, Schedule};

/// Cycles searched before giving up. Two always suffice for a valid rule.
const MAX_CYCLES: u32 = 4;

/// Steps taken by [`next_occurrence_after`] before settling for the last one.
const MAX_CATCH_UP_STEPS: usize = 10_000;

/// The first occurrence of `schedule` strictly after `anchor`.
///
/// # Errors
///
/// Returns [`ScheduleError::OutOfRange`] if no representable occurrence
/// exists (calendar overflow, or a cron expression that never matches).
pub fn next_occurrence(
    schedule: &Schedule,
    anchor: DateTime<Utc>,
) -> Result<DateTime<Utc>, ScheduleError> {
    match schedule {
        Schedule::Cron(cron) => next_cron(cron, anchor),
        Schedule::Interval(interval) => next_interval(interval, anchor).ok_or_else(|| {
            ScheduleError::out_of_range(format!("'{interval}' has no occurrence after {anchor}"))
        }),
    }
}

/// The first occurrence reached from `anchor` that is strictly after `floor`.
///
/// Applies [`next_occurrence`] repeatedly so an overdue task's successor is
/// not itself overdue. Always advances at least once.
///
/// # Errors
///
/// See [`next_occurrence`].
pub fn next_occurrence_after(
    schedule: &Schedule,
    anchor: DateTime<Utc>,
    floor: DateTime<Utc>,
) -> Result<DateTime<Utc>, ScheduleError> {
    if matches!(schedule, Schedule::Cron(_)) {
        return next_occurrence(schedule, anchor.max(floor));
    }

    let mut next = next_occurrence(schedule, anchor)?;
    let mut steps = 1;
    while next <= floor && steps < MAX_CATCH_UP_STEPS {
        next = next_occurrence(schedule, next)?;
        steps += 1;
    }
    if next <= floor {
        tracing::warn!(%schedule, %anchor, %floor, steps, "catch-up stopped before reaching the floor");
    }
    Ok(next)
}

impl Schedule {
    /// See [`next_occurrence`].
    ///
    /// # Errors
    ///
    /// See [`next_occurrence`].
    pub fn next_after(&self, anchor: DateTime<Utc>) -> Result<DateTime<Utc>, ScheduleError> {
        next_occurrence(self, anchor)
    }

    /// The next `n` occurrences after `anchor`, in order.
    ///
    /// # Errors
    ///
    /// See [`next_occurrence`].
    pub fn upcoming(
        &self,
        anchor: DateTime<Utc>,
        n: usize,
    ) -> Result<Vec<DateTime<Utc>>, ScheduleError> {
        let mut occurrences = Vec::with_capacity(n);
        let mut cursor = anchor;
        for _ in 0..n {
            cursor = next_occurrence(self, cursor)?;
            occurrences.push(cursor);
        }
        Ok(occurrences)
    }
}

fn next_cron(cron: &CronSchedule, anchor: DateTime<Utc>) -> Result<DateTime<Utc>, ScheduleError> {
    let parsed = Cron::new(&cron.expression).parse().map_err(|e| {
        ScheduleError::out_of_range(format!("cron expression '{}': {e}", cron.expression))
    })?;
    let next = match cron.timezone {
        Zone::Fixed(offset) => cron_after(&parsed, anchor, &offset),
        Zone::Named(tz) => cron_after(&parsed, anchor, &tz),
        Zone::Local => cron_after(&parsed, anchor, &Local),
    };
    next.map_err(|e| {
        ScheduleError::out_of_range(format!("cron expression '{}': {e}", cron.expression))
    })
}

fn cron_after<Z: TimeZone>(
    cron: &Cron,
    anchor: DateTime<Utc>,
    zone: &Z,
) -> Result<DateTime<Utc>, CronError> {
    cron.find_next_occurrence(&anchor.with_timezone(zone), false)
        .map(|next| next.with_timezone(&Utc))
}

fn next_interval(rule: &IntervalSchedule, anchor: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let local = rule.timezone.wall_clock(anchor);
    let time = rule.time_of_day.unwrap_or_else(|| local.time());
    let slot = Slot {
        date: local.date(),
        time,
        tz: rule.timezone,
        anchor,
    };

    match &rule.selection {
        DaySelection::Any => slot.step(rule),
        DaySelection::Weekdays(days) => slot.weekday(rule.count, days),
        DaySelection::DaysOfMonth(days) => slot.month_day(rule.count, |first| {
            days.iter().filter_map(|d| clamped_day(first, *d)).collect()
        }),
        DaySelection::LastDayOfMonth => {
            slot.month_day(rule.count, |first| last_day_of_month(first).into_iter().collect())
        }
    }
}

/// The anchor split into its local parts, plus the target time of day.
struct Slot {
    date: NaiveDate,
    time: NaiveTime,
    tz: Zone,
    anchor: DateTime<Utc>,
}

impl Slot {
    fn later(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        self.tz.resolve(date.and_time(self.time)).filter(|at| *at > self.anchor)
    }

    fn step(&self, rule: &IntervalSchedule) -> Option<DateTime<Utc>> {
        (1..=MAX_CYCLES).find_map(|cycle| {
            let date = advance(self.date, rule.unit, rule.count.checked_mul(cycle)?)?;
            self.later(date)
        })
    }

    fn weekday(&self, count: u32, days: &BTreeSet<u8>) -> Option<DateTime<Utc>> {
        let monday = week_start(self.date)?;
        (0..MAX_CYCLES).find_map(|cycle| {
            let week = monday.checked_add_days(Days::new(7 * u64::from(count) * u64::from(cycle)))?;
            week.iter_days()
                .take(7)
                .filter(|day| days.contains(&weekday_number(*day)))
                .find_map(|day| self.later(day))
        })
    }

    /// Search the anchor's own month, then every `count`th month after it.
    ///
    /// Cycles are counted from the anchor's month, so `Every 2 months, on
    /// day 1/15` anchored on Jan 1 lands on Jan 15 before jumping to March.
    fn month_day(
        &self,
        count: u32,
        days_in: impl Fn(NaiveDate) -> Vec<NaiveDate>,
    ) -> Option<DateTime<Utc>> {
        (0..MAX_CYCLES).find_map(|cycle| {
            let first = month_start(self.date, count.checked_mul(cycle)?)?;
            days_in(first).into_iter().find_map(|day| self.later(day))
        })
    }
}

/// Weekday number with 0 = Sunday.
fn weekday_number(date: NaiveDate) -> u8 {
    u8::try_from(date.weekday().num_days_from_sunday()).unwrap_or_default()
}
