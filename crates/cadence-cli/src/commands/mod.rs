use anyhow::Context;
use cadence_config::{CadenceConfig, parse_zone};
use cadence_core::Zone;

use crate::cli::{Commands, GlobalFlags};

pub mod next;
pub mod parse;
pub mod run;
pub mod schema;

/// Route a parsed command to its handler.
pub async fn dispatch(command: Commands, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Run(args) => run::handle(&args, flags).await,
        Commands::Parse(args) => parse::handle(&args, flags),
        Commands::Next(args) => next::handle(&args, flags),
        Commands::Schema(args) => schema::handle(&args, flags),
    }
}

fn load_config() -> anyhow::Result<CadenceConfig> {
    CadenceConfig::load_with_dotenv().context("failed to load cadence configuration")
}

/// Zone from `--timezone`, else from `schedule.timezone`.
fn resolve_zone(flag: Option<&str>) -> anyhow::Result<Zone> {
    match flag {
        Some(raw) => parse_zone(raw).with_context(|| format!("invalid --timezone '{raw}'")),
        None => Ok(load_config()?.schedule.zone()?),
    }
}
