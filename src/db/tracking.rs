//! Migration tracking table: DDL, record queries, sentinel detection and
//! backfill.
//!
//! One row per applied migration, keyed by the SHA-256 of the migration
//! file's content. Backfill inserts a row *without* re-running the SQL, to
//! reconcile history with a schema that was created out-of-band.

use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashSet;

use crate::config::BackfillPolicy;
use crate::errors::{AppError, AppResult};
use crate::manifest::Migration;
use crate::ui::messages::{info, success};

pub const TRACKING_TABLE: &str = "_sqlboot_migrations";

#[derive(Debug)]
pub struct TrackingRow {
    pub tag: String,
    pub hash: String,
    pub created_at: i64,
}

/// Create the tracking table if absent. Idempotent, safe on every invocation.
pub fn ensure_tracking_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS _sqlboot_migrations (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            tag        TEXT NOT NULL,
            hash       TEXT NOT NULL,
            created_at BIGINT NOT NULL
        );
        "#,
    )
    .map_err(AppError::Ddl)
}

/// Check if a table exists by name lookup in the catalog.
pub fn table_exists(conn: &Connection, name: &str) -> AppResult<bool> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Fetch all current tracking rows, ascending by tag.
pub fn fetch_records(conn: &Connection) -> AppResult<Vec<TrackingRow>> {
    let mut stmt = conn.prepare(
        "SELECT tag, hash, created_at FROM _sqlboot_migrations ORDER BY tag ASC",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(TrackingRow {
                tag: row.get(0)?,
                hash: row.get(1)?,
                created_at: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Insert a tracking row for one migration.
pub fn insert_record(conn: &Connection, m: &Migration) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO _sqlboot_migrations (tag, hash, created_at) VALUES (?1, ?2, ?3)",
        params![m.tag, m.hash, m.created_at],
    )?;
    Ok(())
}

/// Reconcile a schema created outside the tracked history.
///
/// If the sentinel table exists, synthesize tracking record(s) for the
/// manifest's earliest migration(s) according to the configured policy, so
/// the engine does not try to re-run SQL that the schema already reflects.
/// Returns the tags that were backfilled.
pub fn backfill(
    conn: &mut Connection,
    manifest: &[Migration],
    existing: &[TrackingRow],
    sentinel: Option<&str>,
    policy: BackfillPolicy,
) -> AppResult<Vec<String>> {
    let Some(sentinel) = sentinel else {
        return Ok(Vec::new());
    };

    let Some(earliest) = manifest.first() else {
        return Ok(Vec::new());
    };

    if !table_exists(conn, sentinel)? {
        return Ok(Vec::new());
    }

    let existing_hashes: HashSet<&str> = existing.iter().map(|r| r.hash.as_str()).collect();

    match policy {
        BackfillPolicy::Single => {
            if existing_hashes.contains(earliest.hash.as_str()) {
                return Ok(Vec::new());
            }

            info(format!(
                "Table '{}' exists but '{}' is not recorded, marking...",
                sentinel, earliest.tag
            ));

            insert_record(conn, earliest).map_err(|e| AppError::Backfill {
                tag: earliest.tag.clone(),
                source: e,
            })?;

            success(format!("Marked '{}' as applied", earliest.tag));
            Ok(vec![earliest.tag.clone()])
        }

        BackfillPolicy::Batch => {
            if !existing.is_empty() {
                return Ok(Vec::new());
            }

            let prefix = earliest.tag_prefix().to_string();
            let initial: Vec<&Migration> = manifest
                .iter()
                .filter(|m| m.tag_prefix() == prefix)
                .collect();

            info(format!(
                "Table '{}' exists with empty history, marking {} initial migration(s)...",
                sentinel,
                initial.len()
            ));

            // All-or-nothing: a half-backfilled history is worse than none.
            let tx = conn.transaction()?;
            for m in &initial {
                insert_record(&tx, m).map_err(|e| AppError::Backfill {
                    tag: m.tag.clone(),
                    source: e,
                })?;
            }
            tx.commit()?;

            let tags: Vec<String> = initial.iter().map(|m| m.tag.clone()).collect();
            for tag in &tags {
                success(format!("Marked '{}' as applied", tag));
            }
            Ok(tags)
        }
    }
}
