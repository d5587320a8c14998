use anyhow::Context;
use cadence_core::responses::NextOccurrencesResponse;
use cadence_schedule::ScheduleParser;
use chrono::{DateTime, Utc};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::NextArgs;
use crate::output::output;

/// Handle `cadence next`.
pub fn handle(args: &NextArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let zone = super::resolve_zone(args.timezone.as_deref())?;
    let schedule = ScheduleParser::new(zone).parse(&args.schedule)?;
    let from = match &args.from {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("invalid --from '{raw}' (expected RFC 3339)"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let response = NextOccurrencesResponse {
        schedule: schedule.to_string(),
        from,
        occurrences: schedule.upcoming(from, args.count)?,
    };
    output(&response, flags.format)
}
