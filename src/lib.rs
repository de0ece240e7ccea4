//! fieldclock library root.
//! Exposes the CLI parser, the high-level run() function, and the tracking
//! core used by every command.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod logging;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands::{self, CommandContext};
use cli::parser::{Cli, Commands};
use config::Config;
use crate::core::clock::{Clock, ManualClock, SystemClock};
use crate::core::tracker::Tracker;
use errors::AppResult;
use std::sync::Arc;
use tracing::debug;

/// Clock for this invocation: pinned by `--now`, else the system clock.
fn clock_for(cli: &Cli) -> AppResult<Arc<dyn Clock>> {
    match &cli.now {
        Some(raw) => {
            let at = utils::time::parse_timestamp(raw, utils::date::today())?;
            Ok(Arc::new(ManualClock::new(at)))
        }
        None => Ok(Arc::new(SystemClock)),
    }
}

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => return commands::init::handle(cli),
        Commands::Config { .. } => return commands::config::handle(&cli.command, cfg),
        _ => {}
    }

    let tracker = Tracker::from_config(cfg, clock_for(cli)?)?;
    let ctx = CommandContext {
        tracker: &tracker,
        json: cli.json,
    };

    match &cli.command {
        Commands::CheckIn { .. }
        | Commands::CheckOut { .. }
        | Commands::ReCheckIn { .. }
        | Commands::AutoCheckout { .. } => commands::attendance::handle(&cli.command, &ctx),
        Commands::Activity { .. } => commands::activity::handle(&cli.command, &ctx),
        Commands::Summary { .. } => commands::summary::handle(&cli.command, &ctx),
        Commands::Sessions { .. } => commands::sessions::handle(&cli.command, &ctx),
        Commands::Log { .. } => commands::log::handle(&cli.command, &ctx),
        Commands::Export { .. } => commands::export::handle(&cli.command, &ctx),
        Commands::Init | Commands::Config { .. } => Ok(()),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // Config is loaded once; --db wins over the configured database.
    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    logging::init(&cfg.log_level);
    debug!(database = %cfg.database, "configuration loaded");

    dispatch(&cli, &cfg)
}
