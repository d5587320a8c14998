use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `cadence` binary.
#[derive(Debug, Parser)]
#[command(name = "cadence", version, about = "Cadence - recurring tasks for Notion")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::root_commands::SchemaType;
    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["cadence", "--format", "raw", "--verbose", "run"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["cadence", "run", "--dry-run", "--quiet"])
            .expect("cli should parse");

        assert!(cli.quiet);
        assert_eq!(cli.global_flags().format, OutputFormat::Json);
        match cli.command {
            Commands::Run(args) => {
                assert!(args.dry_run);
                assert_eq!(args.concurrency, None);
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn output_format_rejects_table() {
        assert!(Cli::try_parse_from(["cadence", "--format", "table", "run"]).is_err());
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        assert!(Cli::try_parse_from(["cadence", "run", "--concurrency", "0"]).is_err());
        let cli = Cli::try_parse_from(["cadence", "run", "--concurrency", "8"])
            .expect("cli should parse");
        assert!(matches!(cli.command, Commands::Run(args) if args.concurrency == Some(8)));
    }

    #[test]
    fn next_accepts_negative_offset_and_count() {
        let cli = Cli::try_parse_from([
            "cadence",
            "next",
            "Every 2 days",
            "-n",
            "3",
            "--timezone",
            "-05:00",
            "--from",
            "2024-03-01T09:00:00Z",
        ])
        .expect("cli should parse");

        match cli.command {
            Commands::Next(args) => {
                assert_eq!(args.schedule, "Every 2 days");
                assert_eq!(args.count, 3);
                assert_eq!(args.timezone.as_deref(), Some("-05:00"));
                assert_eq!(args.from.as_deref(), Some("2024-03-01T09:00:00Z"));
            }
            other => panic!("expected next, got {other:?}"),
        }
    }

    #[test]
    fn timezone_accepts_region_names_and_old_flag() {
        let cli = Cli::try_parse_from(["cadence", "parse", "Every day", "--timezone", "America/New_York"])
            .expect("cli should parse");
        assert!(matches!(cli.command, Commands::Parse(args) if args.timezone.as_deref() == Some("America/New_York")));

        let cli = Cli::try_parse_from(["cadence", "parse", "Every day", "--utc-offset", "+02:00"])
            .expect("cli should parse");
        assert!(matches!(cli.command, Commands::Parse(args) if args.timezone.as_deref() == Some("+02:00")));
    }

    #[test]
    fn schema_type_is_kebab_case() {
        let cli = Cli::try_parse_from(["cadence", "schema", "run-report"]).expect("cli should parse");
        assert!(matches!(cli.command, Commands::Schema(args) if args.type_name == SchemaType::RunReport));
        assert!(Cli::try_parse_from(["cadence", "schema", "finding"]).is_err());
    }
}
