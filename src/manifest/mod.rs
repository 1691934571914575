//! Migration manifest loading.
//!
//! A migrations directory contains `meta/_journal.json` (the ordered journal)
//! and one `<tag>.sql` file per entry. The journal is read-only input: the
//! bootstrapper never rewrites it. Each entry's SQL content is hashed with
//! SHA-256 at load time so tracking rows can be compared by content, not by
//! file name.

use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use crate::errors::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct Journal {
    entries: Vec<JournalEntry>,
}

#[derive(Debug, Deserialize)]
struct JournalEntry {
    tag: String,
    /// Creation timestamp, integer epoch milliseconds.
    when: i64,
}

/// A manifest entry paired with its SQL content and content hash.
#[derive(Debug, Clone)]
pub struct Migration {
    pub tag: String,
    pub hash: String,
    pub created_at: i64,
    pub sql: String,
}

impl Migration {
    /// Leading tag segment, e.g. "0000" for "0000_init".
    pub fn tag_prefix(&self) -> &str {
        self.tag.split('_').next().unwrap_or(&self.tag)
    }
}

/// Compute the lowercase hex SHA-256 digest of a migration file's content.
pub fn compute_hash(sql: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(sql.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Load the ordered migration manifest from `dir`.
///
/// Returns entries sorted ascending by tag. Fails if the journal or any
/// referenced SQL file is missing or unreadable.
pub fn load(dir: &Path) -> AppResult<Vec<Migration>> {
    let journal_path = dir.join("meta").join("_journal.json");

    let raw = fs::read_to_string(&journal_path).map_err(|e| AppError::ManifestRead {
        path: journal_path.clone(),
        source: e,
    })?;

    let journal: Journal = serde_json::from_str(&raw).map_err(|e| AppError::JournalParse {
        path: journal_path,
        source: e,
    })?;

    let mut migrations = Vec::with_capacity(journal.entries.len());

    for entry in journal.entries {
        let sql_path = dir.join(format!("{}.sql", entry.tag));
        let sql = fs::read_to_string(&sql_path).map_err(|e| AppError::ManifestRead {
            path: sql_path,
            source: e,
        })?;

        migrations.push(Migration {
            hash: compute_hash(&sql),
            tag: entry.tag,
            created_at: entry.when,
            sql,
        });
    }

    // Journals are written in order, but the apply order must not depend on it.
    migrations.sort_by(|a, b| a.tag.cmp(&b.tag));

    Ok(migrations)
}
