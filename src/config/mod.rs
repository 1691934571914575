use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::errors::{AppError, AppResult};

/// What to do when applying a pending migration fails.
///
/// `Strict` propagates the failure so the deploy halts. `Tolerant` logs it
/// and exits 0 anyway; meant for build pipelines that must not be blocked by
/// a migration, at the price of possibly running against a stale schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ApplyFailurePolicy {
    #[default]
    Strict,
    Tolerant,
}

/// How to synthesize tracking records for a schema created out-of-band.
///
/// `Single` marks only the earliest manifest entry, and only when its hash is
/// not already recorded. `Batch` marks every entry sharing the earliest tag
/// prefix, and only when the tracking table is completely empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackfillPolicy {
    #[default]
    Single,
    Batch,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,
    /// Application table whose existence implies the schema was already
    /// bootstrapped outside the tracked migration history. None disables
    /// the backfill step entirely.
    #[serde(default)]
    pub sentinel_table: Option<String>,
    #[serde(default)]
    pub backfill: BackfillPolicy,
    #[serde(default)]
    pub on_apply_failure: ApplyFailurePolicy,
}

fn default_migrations_dir() -> String {
    "./migrations".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            migrations_dir: default_migrations_dir(),
            sentinel_table: None,
            backfill: BackfillPolicy::default(),
            on_apply_failure: ApplyFailurePolicy::default(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("sqlboot")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".sqlboot")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("sqlboot.yml")
    }

    /// Return the default path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("sqlboot.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_yaml::from_str(&content).map_err(|e| {
                AppError::Config(format!("failed to parse {}: {}", path.display(), e))
            })
        } else {
            Ok(Config::default())
        }
    }

    /// Apply the database connection string from the environment.
    /// First recognized variable wins; the config file value is the fallback.
    pub fn apply_env_overrides(&mut self) {
        for var in ["SQLBOOT_DATABASE_URL", "DATABASE_URL"] {
            if let Ok(url) = env::var(var)
                && !url.is_empty()
            {
                self.database = url;
                return;
            }
        }
    }
}
