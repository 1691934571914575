//! Unified application error type.
//! All modules (db, manifest, bootstrap, cli) return AppError to keep the
//! error handling consistent and easy to manage.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Cannot open database '{path}': {source}")]
    Connection {
        path: String,
        source: rusqlite::Error,
    },

    #[error("Failed to create migration tracking table: {0}")]
    Ddl(rusqlite::Error),

    #[error("Failed to backfill tracking record for '{tag}': {source}")]
    Backfill {
        tag: String,
        source: rusqlite::Error,
    },

    #[error("Migration '{tag}' failed: {source}")]
    MigrationApply {
        tag: String,
        source: rusqlite::Error,
    },

    // ---------------------------
    // Manifest errors
    // ---------------------------
    #[error("Cannot read migration file '{path}': {source}")]
    ManifestRead { path: PathBuf, source: io::Error },

    #[error("Malformed migration journal '{path}': {source}")]
    JournalParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
