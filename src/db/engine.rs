//! Pending-migration application.
//!
//! A migration is pending when its content hash is not recorded in the
//! tracking table. Each pending migration runs inside its own transaction;
//! the tracking row is inserted in that same transaction, so a failed
//! migration leaves no record behind and stops the run.

use rusqlite::Connection;
use std::collections::HashSet;

use crate::db::tracking;
use crate::errors::{AppError, AppResult};
use crate::manifest::Migration;
use crate::ui::messages::success;

/// Apply all migrations whose hash is not in `recorded`, ascending by tag.
/// Returns the tags that were applied.
pub fn apply_pending(
    conn: &mut Connection,
    manifest: &[Migration],
    recorded: &HashSet<String>,
) -> AppResult<Vec<String>> {
    let mut applied = Vec::new();

    for m in manifest {
        if recorded.contains(&m.hash) {
            continue;
        }

        let tx = conn.transaction()?;

        tx.execute_batch(&m.sql).map_err(|e| AppError::MigrationApply {
            tag: m.tag.clone(),
            source: e,
        })?;

        tracking::insert_record(&tx, m).map_err(|e| AppError::MigrationApply {
            tag: m.tag.clone(),
            source: e,
        })?;

        tx.commit()?;

        success(format!("Applied '{}'", m.tag));
        applied.push(m.tag.clone());
    }

    Ok(applied)
}
