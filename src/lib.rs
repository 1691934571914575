//! sqlboot library root.
//! Exposes CLI parser, high-level run() function, and internal modules.

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod db;
pub mod errors;
pub mod manifest;
pub mod ui;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Up { .. } => cli::commands::up::handle(&cli.command, cfg),
        Commands::Status { .. } => cli::commands::status::handle(&cli.command, cfg),
        Commands::History => cli::commands::history::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // Load the config file once, then layer overrides on top:
    // config file < environment < command line.
    let mut cfg = Config::load()?;
    cfg.apply_env_overrides();

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    dispatch(&cli, &cfg)
}
