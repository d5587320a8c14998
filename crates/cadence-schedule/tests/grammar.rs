//! Schedule grammar acceptance and rejection cases.

use std::collections::BTreeSet;

use cadence_core::enums::AnchorField;
use cadence_schedule::{
    DaySelection, IntervalSchedule, Schedule, ScheduleError, ScheduleParser, Unit, Zone, parse,
};
use chrono::{FixedOffset, NaiveTime};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn interval(raw: &str) -> IntervalSchedule {
    match parse(raw) {
        Ok(Schedule::Interval(interval)) => interval,
        other => panic!("expected interval schedule for {raw:?}, got {other:?}"),
    }
}

fn set(days: &[u8]) -> BTreeSet<u8> {
    days.iter().copied().collect()
}

#[test]
fn weekday_shorthand_matches_numbered_days() {
    let named = parse("Every mon/tuesday, at 9am").unwrap();
    let numbered = parse("Every 1 weeks, on day 1/2, at 9am").unwrap();
    assert_eq!(named, numbered);

    let bare = parse("mon/tuesday, at 9am").unwrap();
    assert_eq!(bare, numbered);
}

#[test]
fn day_ranges_expand() {
    let rule = interval("Every 1 months, on day 1/5-9");
    assert_eq!(rule.unit, Unit::Month);
    assert_eq!(rule.selection, DaySelection::DaysOfMonth(set(&[1, 5, 6, 7, 8, 9])));
}

#[test]
fn last_day_of_month() {
    let rule = interval("Every 1 months, on the last day");
    assert_eq!(rule.count, 1);
    assert_eq!(rule.selection, DaySelection::LastDayOfMonth);
}

#[test]
fn full_interval_with_time_and_anchor() {
    let rule = interval("every 3 days, at 7:15pm, from completed date");
    assert_eq!(rule.count, 3);
    assert_eq!(rule.unit, Unit::Day);
    assert_eq!(rule.selection, DaySelection::Any);
    assert_eq!(rule.time_of_day, NaiveTime::from_hms_opt(19, 15, 0));
    assert_eq!(rule.anchor_field, Some(AnchorField::CompletedDate));
}

#[test]
fn case_and_whitespace_are_tolerated() {
    let tidy = parse("Every 2 weeks, on mon/thu, at 09:00").unwrap();
    let messy = parse("  EVERY   2   Weeks ,on MON / Thu,   AT 9 AM ").unwrap();
    assert_eq!(tidy, messy);
}

#[test]
fn clause_order_after_head_is_free() {
    let a = parse("Every 1 months, on day 15, at 8am").unwrap();
    let b = parse("Every 1 months, at 8am, on day 15").unwrap();
    assert_eq!(a, b);
}

#[rstest]
#[case("Every day", 1, Unit::Day)]
#[case("Every 1 day", 1, Unit::Day)]
#[case("Every 10 days", 10, Unit::Day)]
#[case("Every week", 1, Unit::Week)]
#[case("Every 2 weeks", 2, Unit::Week)]
#[case("Every 6 months", 6, Unit::Month)]
#[case("Every 1 year", 1, Unit::Year)]
fn head_forms(#[case] raw: &str, #[case] count: u32, #[case] unit: Unit) {
    let rule = interval(raw);
    assert_eq!((rule.count, rule.unit), (count, unit));
}

#[test]
fn every_weekday_selects_monday_to_friday() {
    let rule = interval("Every weekday, at 8:30am");
    assert_eq!(rule.unit, Unit::Week);
    assert_eq!(rule.selection, DaySelection::Weekdays(set(&[1, 2, 3, 4, 5])));
}

#[rstest]
#[case::day_and_weekday("Every 1 weeks, on day 1, on mon")]
#[case::head_and_on("Every mon, on tue")]
#[case::from_with_weekdays("Every 1 weeks, on mon, from due date")]
#[case::from_with_days("Every 1 months, on day 3, from completed date")]
#[case::from_with_shorthand("Every mon/wed, from due date")]
#[case::two_times("Every day, at 9am, at 10am")]
fn conflicting_clauses_are_ambiguous(#[case] raw: &str) {
    let err = parse(raw).unwrap_err();
    assert!(
        matches!(err, ScheduleError::Ambiguous { .. }),
        "expected ambiguity for {raw:?}, got {err:?}"
    );
}

#[rstest]
#[case::empty("")]
#[case::blank("   ")]
#[case::zero_count("Every 0 days")]
#[case::unknown_unit("Every 2 fortnights")]
#[case::weekday_on_month("Every 1 months, on mon")]
#[case::day_on_year("Every 1 years, on day 3")]
#[case::last_day_on_week("Every 2 weeks, on the last day")]
#[case::day_out_of_range("Every 1 months, on day 32")]
#[case::weekday_number_out_of_range("Every 1 weeks, on day 7")]
#[case::bare_hour("Every day, at 9")]
#[case::bad_anchor("Every day, from start date")]
#[case::trailing_comma("Every day,")]
#[case::blue_moon("Every blue moon")]
fn malformed_strings_are_rejected(#[case] raw: &str) {
    let err = parse(raw).unwrap_err();
    assert!(err.is_parse_error(), "expected parse error for {raw:?}, got {err:?}");
}

#[test]
fn non_grammar_strings_fall_back_to_cron() {
    let schedule = parse("0 9 * * 1-5").unwrap();
    assert_eq!(schedule.kind(), "cron");
    assert!(schedule.selects_days());
    assert_eq!(schedule.to_string(), "0 9 * * 1-5");
}

#[test]
fn cron_failure_reports_the_grammar_error() {
    let err = parse("Every 3 sprints").unwrap_err();
    assert_eq!(
        err,
        ScheduleError::Syntax {
            input: "Every 3 sprints".into(),
            reason: "unknown unit 'sprints'".into(),
        }
    );
}

#[rstest]
#[case("Every mon/tuesday, at 9am", "Every 1 weeks, on mon/tue, at 09:00")]
#[case("Every 1 months, on day 1/5-9", "Every 1 months, on day 1/5/6/7/8/9")]
#[case("every 2 days, from due date", "Every 2 days, from due date")]
#[case("Every 1 months, on the last day, at 23:30:15", "Every 1 months, on the last day, at 23:30:15")]
fn canonical_display(#[case] raw: &str, #[case] canonical: &str) {
    let schedule = parse(raw).unwrap();
    assert_eq!(schedule.to_string(), canonical);
    assert_eq!(parse(canonical).unwrap(), schedule);
}

#[test]
fn parser_carries_its_offset() {
    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    let schedule = ScheduleParser::new(offset).parse("Every day").unwrap();
    assert_eq!(schedule.timezone(), Zone::Fixed(offset));
}

#[test]
fn parser_accepts_region_zones() {
    let zone: Zone = "Europe/Paris".parse().unwrap();
    let schedule = ScheduleParser::new(zone).parse("0 9 * * *").unwrap();
    assert_eq!(schedule.timezone(), zone);
}
