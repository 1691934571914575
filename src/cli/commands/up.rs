use crate::bootstrap::{self, BootstrapOptions};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};

/// Handle the `up` command: run the full bootstrap procedure.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Up {
        dir,
        sentinel,
        backfill,
        ..
    } = cmd
    {
        let opts = BootstrapOptions::from_config(
            cfg,
            dir.as_deref(),
            sentinel.as_deref(),
            *backfill,
            cmd.apply_failure_override(),
        );

        let mut pool = DbPool::new(&cfg.database).map_err(|e| AppError::Connection {
            path: cfg.database.clone(),
            source: e,
        })?;

        bootstrap::run(&mut pool, &opts)?;
    }

    Ok(())
}
