use anyhow::Context;
use cadence_notion::NotionClient;
use cadence_worker::{RecurrenceWorker, WorkerSettings};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RunArgs;
use crate::output::output;

/// Handle `cadence run`.
///
/// Per-task failures are reported in the output and do not fail the command.
pub async fn handle(args: &RunArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut config = super::load_config()?;
    if args.dry_run {
        config.worker.dry_run = true;
    }
    if let Some(concurrency) = args.concurrency {
        config.worker.concurrency = usize::from(concurrency);
    }

    let settings = WorkerSettings::from_config(&config)?;
    let notion = config.notion.require()?;
    let client = NotionClient::new(notion, settings.timezone)
        .context("failed to build Notion client")?;

    let worker = RecurrenceWorker::new(client, settings);
    let report = worker.run().await?;
    if report.failed > 0 {
        tracing::warn!(failed = report.failed, "some tasks could not be rescheduled");
    }
    output(&report, flags.format)
}
