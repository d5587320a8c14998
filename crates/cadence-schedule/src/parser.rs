//! Recursive-descent parser for the schedule grammar.
//!
//! A schedule string is a comma-separated list of clauses. The first clause
//! is the head (`Every 2 weeks`, `Every day`, `mon/tuesday`); the rest are
//! `on …`, `at …` and `from …` clauses in any order, each at most once.
//! Anything the interval grammar rejects is retried as a cron expression.

use std::collections::BTreeSet;

use cadence_core::Zone;
use cadence_core::enums::AnchorField;
use chrono::NaiveTime;
use croner::Cron;

use crate::error::ScheduleError;
use crate::types::{CronSchedule, DaySelection, IntervalSchedule, Schedule, Unit};

/// Parses schedule strings for one time zone.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleParser {
    timezone: Zone,
}

impl Default for ScheduleParser {
    fn default() -> Self {
        Self::utc()
    }
}

impl ScheduleParser {
    #[must_use]
    pub fn new(timezone: impl Into<Zone>) -> Self {
        Self { timezone: timezone.into() }
    }

    #[must_use]
    pub fn utc() -> Self {
        Self::new(Zone::utc())
    }

    #[must_use]
    pub const fn timezone(&self) -> Zone {
        self.timezone
    }

    /// Parse `raw` into a [`Schedule`].
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::Ambiguous`] when mutually exclusive clauses are
    /// combined, and [`ScheduleError::Syntax`] when the string matches neither
    /// the interval grammar nor a cron expression.
    pub fn parse(&self, raw: &str) -> Result<Schedule, ScheduleError> {
        let input = raw.trim();
        if input.is_empty() {
            return Err(ScheduleError::syntax(raw, "schedule is empty"));
        }

        match self.parse_interval(input) {
            Ok(interval) => Ok(Schedule::Interval(interval)),
            Err(interval_error) => match Cron::new(input).parse() {
                Ok(_) => {
                    tracing::debug!(schedule = input, "parsed as cron expression");
                    Ok(Schedule::Cron(CronSchedule {
                        expression: input.to_string(),
                        timezone: self.timezone,
                    }))
                }
                Err(cron_error) => {
                    tracing::debug!(schedule = input, %cron_error, "not a cron expression either");
                    Err(interval_error)
                }
            },
        }
    }

    fn parse_interval(&self, input: &str) -> Result<IntervalSchedule, ScheduleError> {
        let lowered = input.to_ascii_lowercase();
        let clauses: Vec<String> = lowered.split(',').map(normalize_spaces).collect();
        if clauses.iter().any(String::is_empty) {
            return Err(ScheduleError::syntax(input, "empty clause"));
        }

        let head = parse_head(input, &clauses[0])?;

        let mut on: Option<OnClause<'_>> = None;
        let mut at: Option<NaiveTime> = None;
        let mut from: Option<AnchorField> = None;

        for clause in &clauses[1..] {
            let (keyword, rest) = clause
                .split_once(' ')
                .ok_or_else(|| ScheduleError::syntax(input, format!("incomplete clause '{clause}'")))?;
            match keyword {
                "on" => {
                    if on.is_some() {
                        return Err(ScheduleError::ambiguous(input, "more than one 'on' clause"));
                    }
                    on = Some(parse_on(input, rest)?);
                }
                "at" => {
                    if at.is_some() {
                        return Err(ScheduleError::ambiguous(input, "more than one 'at' clause"));
                    }
                    at = Some(parse_time_of_day(rest).ok_or_else(|| {
                        ScheduleError::syntax(input, format!("unrecognized time '{rest}'"))
                    })?);
                }
                "from" => {
                    if from.is_some() {
                        return Err(ScheduleError::ambiguous(input, "more than one 'from' clause"));
                    }
                    from = Some(parse_anchor(input, rest)?);
                }
                _ => {
                    return Err(ScheduleError::syntax(
                        input,
                        format!("unrecognized clause '{clause}'"),
                    ));
                }
            }
        }

        let selection = match on {
            None => head.selection,
            Some(_) if !head.selection.is_any() => {
                return Err(ScheduleError::ambiguous(
                    input,
                    "days are selected by both the head and an 'on' clause",
                ));
            }
            Some(clause) => resolve_on(input, head.unit, clause)?,
        };

        if from.is_some() && !selection.is_any() {
            return Err(ScheduleError::ambiguous(
                input,
                "'from' cannot be combined with a day selection",
            ));
        }

        Ok(IntervalSchedule {
            count: head.count,
            unit: head.unit,
            selection,
            time_of_day: at,
            anchor_field: from,
            timezone: self.timezone,
        })
    }
}

/// Parse `raw` with UTC as the local offset.
///
/// # Errors
///
/// See [`ScheduleParser::parse`].
pub fn parse(raw: &str) -> Result<Schedule, ScheduleError> {
    ScheduleParser::utc().parse(raw)
}

struct Head {
    count: u32,
    unit: Unit,
    selection: DaySelection,
}

enum OnClause<'a> {
    Weekdays(BTreeSet<u8>),
    DayNumbers(&'a str),
    LastDay,
}

fn normalize_spaces(clause: &str) -> String {
    clause.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_head(input: &str, clause: &str) -> Result<Head, ScheduleError> {
    let body = match clause.split_once(' ') {
        Some(("every", rest)) => rest,
        _ if clause == "every" => {
            return Err(ScheduleError::syntax(input, "'every' needs an interval"));
        }
        _ => clause,
    };

    if matches!(body, "weekday" | "weekdays") {
        return Ok(Head {
            count: 1,
            unit: Unit::Week,
            selection: DaySelection::Weekdays((1..=5).collect()),
        });
    }
    if let Some(unit) = parse_unit(body) {
        return Ok(Head {
            count: 1,
            unit,
            selection: DaySelection::Any,
        });
    }

    let mut words = body.split(' ');
    let first = words.next().unwrap_or_default();
    if !first.is_empty() && first.chars().all(|c| c.is_ascii_digit()) {
        let count: u32 = first
            .parse()
            .map_err(|_| ScheduleError::syntax(input, format!("count '{first}' is too large")))?;
        if count == 0 {
            return Err(ScheduleError::syntax(input, "count must be at least 1"));
        }
        let unit_word = words
            .next()
            .ok_or_else(|| ScheduleError::syntax(input, "missing interval unit"))?;
        if let Some(extra) = words.next() {
            return Err(ScheduleError::syntax(
                input,
                format!("unexpected '{extra}' after interval unit"),
            ));
        }
        let unit = parse_unit(unit_word)
            .ok_or_else(|| ScheduleError::syntax(input, format!("unknown unit '{unit_word}'")))?;
        return Ok(Head {
            count,
            unit,
            selection: DaySelection::Any,
        });
    }

    let weekdays = parse_weekday_list(input, body)?;
    Ok(Head {
        count: 1,
        unit: Unit::Week,
        selection: DaySelection::Weekdays(weekdays),
    })
}

fn parse_unit(word: &str) -> Option<Unit> {
    match word {
        "day" | "days" => Some(Unit::Day),
        "week" | "weeks" => Some(Unit::Week),
        "month" | "months" => Some(Unit::Month),
        "year" | "years" => Some(Unit::Year),
        _ => None,
    }
}

fn parse_on<'a>(input: &str, rest: &'a str) -> Result<OnClause<'a>, ScheduleError> {
    if rest == "the last day" {
        return Ok(OnClause::LastDay);
    }
    if let Some(("day" | "days", numbers)) = rest.split_once(' ') {
        return Ok(OnClause::DayNumbers(numbers));
    }
    parse_weekday_list(input, rest).map(OnClause::Weekdays)
}

fn resolve_on(input: &str, unit: Unit, clause: OnClause<'_>) -> Result<DaySelection, ScheduleError> {
    match (clause, unit) {
        (OnClause::Weekdays(days), Unit::Week) => Ok(DaySelection::Weekdays(days)),
        (OnClause::Weekdays(_), _) => Err(ScheduleError::syntax(
            input,
            "weekday names require a weekly interval",
        )),
        (OnClause::DayNumbers(list), Unit::Week) => {
            let days = parse_number_list(input, list, 0, 6)?;
            Ok(DaySelection::Weekdays(days))
        }
        (OnClause::DayNumbers(list), Unit::Month) => {
            let days = parse_number_list(input, list, 1, 31)?;
            Ok(DaySelection::DaysOfMonth(days))
        }
        (OnClause::DayNumbers(_), _) => Err(ScheduleError::syntax(
            input,
            format!("'on day' is not supported for {unit} intervals"),
        )),
        (OnClause::LastDay, Unit::Month) => Ok(DaySelection::LastDayOfMonth),
        (OnClause::LastDay, _) => Err(ScheduleError::syntax(
            input,
            "'on the last day' requires a monthly interval",
        )),
    }
}

fn parse_anchor(input: &str, rest: &str) -> Result<AnchorField, ScheduleError> {
    match rest {
        "due date" => Ok(AnchorField::DueDate),
        "completed date" => Ok(AnchorField::CompletedDate),
        other => Err(ScheduleError::syntax(
            input,
            format!("unknown anchor '{other}' (expected 'due date' or 'completed date')"),
        )),
    }
}

/// Weekday number for a 3-letter abbreviation or full name (0 = Sunday).
fn weekday_number(name: &str) -> Option<u8> {
    match name {
        "sun" | "sunday" => Some(0),
        "mon" | "monday" => Some(1),
        "tue" | "tuesday" => Some(2),
        "wed" | "wednesday" => Some(3),
        "thu" | "thursday" => Some(4),
        "fri" | "friday" => Some(5),
        "sat" | "saturday" => Some(6),
        _ => None,
    }
}

/// `/`-separated weekday names or inclusive name ranges (`mon-fri`).
fn parse_weekday_list(input: &str, list: &str) -> Result<BTreeSet<u8>, ScheduleError> {
    let lookup = |name: &str| {
        weekday_number(name.trim())
            .ok_or_else(|| ScheduleError::syntax(input, format!("unknown weekday '{}'", name.trim())))
    };

    let mut days = BTreeSet::new();
    for item in list.split('/').map(str::trim) {
        if item.is_empty() {
            return Err(ScheduleError::syntax(input, "empty weekday in list"));
        }
        if let Some((start, end)) = item.split_once('-') {
            let (start, end) = (lookup(start)?, lookup(end)?);
            if start > end {
                return Err(ScheduleError::syntax(
                    input,
                    format!("weekday range '{item}' runs backwards"),
                ));
            }
            days.extend(start..=end);
        } else {
            days.insert(lookup(item)?);
        }
    }
    Ok(days)
}

/// `/`-separated numbers or inclusive ranges (`1/5-9`), each within `min..=max`.
fn parse_number_list(
    input: &str,
    list: &str,
    min: u8,
    max: u8,
) -> Result<BTreeSet<u8>, ScheduleError> {
    let number = |text: &str| {
        let text = text.trim();
        text.parse::<u8>()
            .ok()
            .filter(|n| (min..=max).contains(n))
            .ok_or_else(|| {
                ScheduleError::syntax(
                    input,
                    format!("day '{text}' is not a number between {min} and {max}"),
                )
            })
    };

    let mut days = BTreeSet::new();
    for item in list.split('/').map(str::trim) {
        if item.is_empty() {
            return Err(ScheduleError::syntax(input, "empty day in list"));
        }
        if let Some((start, end)) = item.split_once('-') {
            let (start, end) = (number(start)?, number(end)?);
            if start > end {
                return Err(ScheduleError::syntax(
                    input,
                    format!("day range '{item}' runs backwards"),
                ));
            }
            days.extend(start..=end);
        } else {
            days.insert(number(item)?);
        }
    }
    Ok(days)
}

/// Clock times: `9am`, `9 am`, `9:30pm`, `09:30`, `21:15:00`, `noon`, `midnight`.
///
/// A bare hour without `am`/`pm` is rejected.
fn parse_time_of_day(text: &str) -> Option<NaiveTime> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    match compact.as_str() {
        "noon" => return NaiveTime::from_hms_opt(12, 0, 0),
        "midnight" => return NaiveTime::from_hms_opt(0, 0, 0),
        _ => {}
    }

    let meridiem = if let Some(clock) = compact.strip_suffix("am") {
        Some((clock, false))
    } else {
        compact.strip_suffix("pm").map(|clock| (clock, true))
    };

    if let Some((clock, pm)) = meridiem {
        let mut parts = clock.split(':');
        let hour: u32 = parts.next()?.parse().ok()?;
        let minute: u32 = parts.next().map_or(Some(0), |m| {
            (m.len() == 2).then(|| m.parse().ok()).flatten()
        })?;
        if parts.next().is_some() || !(1..=12).contains(&hour) {
            return None;
        }
        let hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
        return NaiveTime::from_hms_opt(hour, minute, 0);
    }

    NaiveTime::parse_from_str(&compact, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(&compact, "%H:%M"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, m, 0)
    }

    #[test]
    fn meridiem_times() {
        assert_eq!(parse_time_of_day("9am"), time(9, 0));
        assert_eq!(parse_time_of_day("9 am"), time(9, 0));
        assert_eq!(parse_time_of_day("9:30pm"), time(21, 30));
        assert_eq!(parse_time_of_day("12am"), time(0, 0));
        assert_eq!(parse_time_of_day("12pm"), time(12, 0));
        assert_eq!(parse_time_of_day("13pm"), None);
        assert_eq!(parse_time_of_day("9:5pm"), None);
    }

    #[test]
    fn twenty_four_hour_times() {
        assert_eq!(parse_time_of_day("09:30"), time(9, 30));
        assert_eq!(parse_time_of_day("21:15:00"), time(21, 15));
        assert_eq!(parse_time_of_day("noon"), time(12, 0));
        assert_eq!(parse_time_of_day("midnight"), time(0, 0));
        assert_eq!(parse_time_of_day("25:00"), None);
        assert_eq!(parse_time_of_day("9"), None);
    }

    #[test]
    fn weekday_ranges_expand() {
        let days = parse_weekday_list("x", "mon - wed/sat").unwrap();
        assert_eq!(days.into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 6]);
        assert!(parse_weekday_list("x", "fri-mon").is_err());
        assert!(parse_weekday_list("x", "tues").is_err());
    }

    #[test]
    fn number_lists_are_bounded() {
        let days = parse_number_list("x", "1/5-9", 1, 31).unwrap();
        assert_eq!(days.into_iter().collect::<Vec<_>>(), vec![1, 5, 6, 7, 8, 9]);
        assert!(parse_number_list("x", "0", 1, 31).is_err());
        assert!(parse_number_list("x", "7", 0, 6).is_err());
        assert!(parse_number_list("x", "1-400", 1, 31).is_err());
        assert!(parse_number_list("x", "1//2", 1, 31).is_err());
    }
}
