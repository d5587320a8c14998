use cadence_core::responses::ScheduleDescription;
use cadence_schedule::{DaySelection, Schedule, ScheduleParser};
use chrono::Timelike;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ParseArgs;
use crate::output::output;

/// Handle `cadence parse`.
pub fn handle(args: &ParseArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let zone = super::resolve_zone(args.timezone.as_deref())?;
    let schedule = ScheduleParser::new(zone).parse(&args.schedule)?;
    output(&describe(&args.schedule, &schedule), flags.format)
}

/// Flatten a parsed schedule into its response shape.
pub fn describe(input: &str, schedule: &Schedule) -> ScheduleDescription {
    let mut description = ScheduleDescription {
        input: input.to_string(),
        kind: schedule.kind().to_string(),
        canonical: schedule.to_string(),
        timezone: schedule.timezone().to_string(),
        expression: None,
        count: None,
        unit: None,
        weekdays: Vec::new(),
        days_of_month: Vec::new(),
        last_day_of_month: false,
        time_of_day: None,
        anchor_field: None,
    };

    match schedule {
        Schedule::Cron(cron) => description.expression = Some(cron.expression.clone()),
        Schedule::Interval(rule) => {
            description.count = Some(rule.count);
            description.unit = Some(rule.unit.to_string());
            match &rule.selection {
                DaySelection::Any => {}
                DaySelection::Weekdays(days) => description.weekdays = days.iter().copied().collect(),
                DaySelection::DaysOfMonth(days) => {
                    description.days_of_month = days.iter().copied().collect();
                }
                DaySelection::LastDayOfMonth => description.last_day_of_month = true,
            }
            description.time_of_day = rule.time_of_day.map(|time| {
                if time.second() == 0 {
                    time.format("%H:%M").to_string()
                } else {
                    time.format("%H:%M:%S").to_string()
                }
            });
            description.anchor_field = rule.anchor_field.map(|field| field.as_str().to_string());
        }
    }

    description
}
