//! Calendar arithmetic on local dates.
//!
//! Month and year steps go through `chrono::Months`, which clamps to the last
//! valid day of the target month (Jan 31 + 1 month = Feb 28/29).

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::types::Unit;

/// Step `date` forward by `n` units.
pub(crate) fn advance(date: NaiveDate, unit: Unit, n: u32) -> Option<NaiveDate> {
    match unit {
        Unit::Day => date.checked_add_days(Days::new(u64::from(n))),
        Unit::Week => date.checked_add_days(Days::new(u64::from(n) * 7)),
        Unit::Month => date.checked_add_months(Months::new(n)),
        Unit::Year => date.checked_add_months(Months::new(n.checked_mul(12)?)),
    }
}

/// First day of the month `months` after the month containing `date`.
pub(crate) fn month_start(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?.checked_add_months(Months::new(months))
}

/// Final day of the month containing `date`.
pub(crate) fn last_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
    month_start(date, 1)?.pred_opt()
}

/// Day `day` of the month starting at `first`, clamped to the month's length.
pub(crate) fn clamped_day(first: NaiveDate, day: u8) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(first.year(), first.month(), u32::from(day))
        .or_else(|| last_day_of_month(first))
}

/// Monday of the week containing `date`.
pub(crate) fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(
        date.weekday().num_days_from_monday(),
    )))
}
