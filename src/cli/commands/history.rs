use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::tracking::{self, TRACKING_TABLE};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{GREY, RESET, info};
use chrono::DateTime;

/// Handle the `history` command: print the tracking table.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::History) {
        let pool = DbPool::new(&cfg.database).map_err(|e| AppError::Connection {
            path: cfg.database.clone(),
            source: e,
        })?;

        if !tracking::table_exists(&pool.conn, TRACKING_TABLE)? {
            info("No migration history (tracking table not created yet).");
            return Ok(());
        }

        let records = tracking::fetch_records(&pool.conn)?;
        if records.is_empty() {
            info("No migrations recorded.");
            return Ok(());
        }

        println!();
        for r in records {
            let when = DateTime::from_timestamp_millis(r.created_at)
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| r.created_at.to_string());
            let short_hash = &r.hash[..12.min(r.hash.len())];
            println!("{}  {}{}{}  {}", r.tag, GREY, short_hash, RESET, when);
        }
        println!();
    }

    Ok(())
}
