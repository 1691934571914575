use crate::config::{ApplyFailurePolicy, BackfillPolicy};
use clap::{Parser, Subcommand};

/// Command-line interface definition for sqlboot
/// Deploy-time CLI to bootstrap and apply SQL migrations against SQLite
#[derive(Parser)]
#[command(
    name = "sqlboot",
    version = env!("CARGO_PKG_VERSION"),
    about = "Bootstrap a migration tracking table, backfill pre-existing schemas, and apply pending SQL migrations",
    long_about = None
)]
pub struct Cli {
    /// Override database path (takes precedence over environment and config)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bootstrap: ensure tracking table, backfill, apply pending migrations
    Up {
        /// Migrations directory (contains meta/_journal.json and one .sql per tag)
        #[arg(long = "dir", value_name = "DIR")]
        dir: Option<String>,

        /// Sentinel table whose presence marks an out-of-band bootstrapped schema
        #[arg(long = "sentinel", value_name = "TABLE")]
        sentinel: Option<String>,

        /// Backfill policy when the sentinel table exists
        #[arg(long = "backfill", value_enum)]
        backfill: Option<BackfillPolicy>,

        /// Exit 0 even if applying a pending migration fails (deploy-pipeline mode)
        #[arg(long = "tolerant", conflicts_with = "strict")]
        tolerant: bool,

        /// Exit non-zero on any migration failure (default)
        #[arg(long = "strict", conflicts_with = "tolerant")]
        strict: bool,
    },

    /// Show applied and pending migrations without touching the database
    Status {
        /// Migrations directory (contains meta/_journal.json and one .sql per tag)
        #[arg(long = "dir", value_name = "DIR")]
        dir: Option<String>,
    },

    /// Print the migration tracking table
    History,
}

impl Commands {
    /// Resolve the apply-failure policy from the `--tolerant` / `--strict`
    /// pair, falling back to the configured default when neither is given.
    pub fn apply_failure_override(&self) -> Option<ApplyFailurePolicy> {
        match self {
            Commands::Up {
                tolerant, strict, ..
            } => {
                if *tolerant {
                    Some(ApplyFailurePolicy::Tolerant)
                } else if *strict {
                    Some(ApplyFailurePolicy::Strict)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}
