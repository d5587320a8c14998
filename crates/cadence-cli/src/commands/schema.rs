use cadence_core::Task;
use cadence_core::responses::{NextOccurrencesResponse, RunReport, ScheduleDescription};
use schemars::schema_for;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{SchemaArgs, SchemaType};
use crate::output::output;

/// Handle `cadence schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&schema(args.type_name), flags.format)
}

fn schema(type_name: SchemaType) -> schemars::Schema {
    match type_name {
        SchemaType::RunReport => schema_for!(RunReport),
        SchemaType::Task => schema_for!(Task),
        SchemaType::Schedule => schema_for!(ScheduleDescription),
        SchemaType::Occurrences => schema_for!(NextOccurrencesResponse),
    }
}
