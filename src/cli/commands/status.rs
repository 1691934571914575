use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::tracking::{self, TRACKING_TABLE};
use crate::errors::{AppError, AppResult};
use crate::manifest;
use crate::ui::messages::{FG_CYAN, FG_GREEN, FG_YELLOW, GREY, RESET};
use std::collections::HashSet;
use std::path::PathBuf;

/// Handle the `status` command: show applied and pending migrations.
/// Read-only; a database without a tracking table counts as zero applied.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Status { dir } = cmd {
        let dir = PathBuf::from(dir.as_deref().unwrap_or(&cfg.migrations_dir));
        let manifest = manifest::load(&dir)?;

        let pool = DbPool::new(&cfg.database).map_err(|e| AppError::Connection {
            path: cfg.database.clone(),
            source: e,
        })?;

        let recorded: HashSet<String> = if tracking::table_exists(&pool.conn, TRACKING_TABLE)? {
            tracking::fetch_records(&pool.conn)?
                .into_iter()
                .map(|r| r.hash)
                .collect()
        } else {
            HashSet::new()
        };

        let pending: Vec<&str> = manifest
            .iter()
            .filter(|m| !recorded.contains(&m.hash))
            .map(|m| m.tag.as_str())
            .collect();

        println!();
        println!("{}• Database:{} {}", FG_CYAN, RESET, cfg.database);
        println!("{}• Manifest:{} {}", FG_CYAN, RESET, dir.display());
        println!(
            "{}• Applied:{} {}{}{} of {}",
            FG_CYAN,
            RESET,
            FG_GREEN,
            manifest.len() - pending.len(),
            RESET,
            manifest.len()
        );

        if pending.is_empty() {
            println!("{}• Pending:{} {}none{}", FG_CYAN, RESET, GREY, RESET);
        } else {
            println!("{}• Pending:{}", FG_CYAN, RESET);
            for tag in pending {
                println!("    {}{}{}", FG_YELLOW, tag, RESET);
            }
        }
        println!();
    }

    Ok(())
}
