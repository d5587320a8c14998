use clap::{Args, Subcommand, ValueEnum};

/// Root subcommands for `cadence`.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create next occurrences for recurring tasks completed since the last run.
    Run(RunArgs),
    /// Parse a schedule string and describe it.
    Parse(ParseArgs),
    /// List upcoming occurrences of a schedule.
    Next(NextArgs),
    /// Print the JSON schema of a response type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct RunArgs {
    /// Report what would be created without writing tasks or a checkpoint
    #[arg(long)]
    pub dry_run: bool,

    /// Tasks processed at once (overrides worker.concurrency)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: Option<u16>,
}

#[derive(Clone, Debug, Args)]
pub struct ParseArgs {
    /// Schedule string, e.g. "Every 2 weeks, on mon/thu, at 9am"
    pub schedule: String,

    /// Time zone, e.g. America/New_York or +05:30 (defaults to schedule.timezone)
    #[arg(long, visible_alias = "utc-offset", allow_hyphen_values = true)]
    pub timezone: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct NextArgs {
    /// Schedule string
    pub schedule: String,

    /// Anchor instant as RFC 3339 (defaults to now)
    #[arg(long)]
    pub from: Option<String>,

    /// Number of occurrences to list
    #[arg(short = 'n', long = "count", default_value_t = 5)]
    pub count: usize,

    /// Time zone, e.g. America/New_York or +05:30 (defaults to schedule.timezone)
    #[arg(long, visible_alias = "utc-offset", allow_hyphen_values = true)]
    pub timezone: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Response type to describe
    #[arg(value_enum)]
    pub type_name: SchemaType,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaType {
    RunReport,
    Task,
    Schedule,
    Occurrences,
}
