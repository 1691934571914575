//! The bootstrap procedure: a linear one-shot contract run at deploy time.
//!
//! Steps, in order:
//!   1. ensure the tracking table exists (idempotent DDL)
//!   2. load the manifest and hash every migration file
//!   3. fetch existing tracking rows
//!   4. look up the sentinel table in the catalog
//!   5. backfill tracking record(s) if the schema pre-exists untracked
//!   6. apply pending migrations, one transaction each
//!
//! Steps 1-5 are always strict: any failure halts the deploy. Step 6 honors
//! the configured apply-failure policy.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::config::{ApplyFailurePolicy, BackfillPolicy, Config};
use crate::db::pool::DbPool;
use crate::db::{engine, tracking};
use crate::errors::{AppError, AppResult};
use crate::manifest;
use crate::ui::messages::{error, info, success, warning};

#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    pub migrations_dir: PathBuf,
    pub sentinel_table: Option<String>,
    pub backfill: BackfillPolicy,
    pub on_apply_failure: ApplyFailurePolicy,
}

impl BootstrapOptions {
    /// Build options from the loaded config, with per-invocation overrides
    /// from the command line taking precedence.
    pub fn from_config(
        cfg: &Config,
        dir: Option<&str>,
        sentinel: Option<&str>,
        backfill: Option<BackfillPolicy>,
        on_apply_failure: Option<ApplyFailurePolicy>,
    ) -> Self {
        Self {
            migrations_dir: PathBuf::from(dir.unwrap_or(&cfg.migrations_dir)),
            sentinel_table: sentinel
                .map(str::to_string)
                .or_else(|| cfg.sentinel_table.clone()),
            backfill: backfill.unwrap_or(cfg.backfill),
            on_apply_failure: on_apply_failure.unwrap_or(cfg.on_apply_failure),
        }
    }
}

#[derive(Debug, Default)]
pub struct BootstrapReport {
    pub backfilled: Vec<String>,
    pub applied: Vec<String>,
}

/// Run the full bootstrap contract against an open connection.
pub fn run(pool: &mut DbPool, opts: &BootstrapOptions) -> AppResult<BootstrapReport> {
    info("Checking migration tracking table...");
    tracking::ensure_tracking_table(&pool.conn)?;

    let manifest = manifest::load(&opts.migrations_dir)?;
    if manifest.is_empty() {
        warning(format!(
            "No migrations found in {}",
            opts.migrations_dir.display()
        ));
        return Ok(BootstrapReport::default());
    }

    let existing = tracking::fetch_records(&pool.conn)?;

    let backfilled = tracking::backfill(
        &mut pool.conn,
        &manifest,
        &existing,
        opts.sentinel_table.as_deref(),
        opts.backfill,
    )?;

    // Recorded = rows present before the run plus anything just backfilled.
    let mut recorded: HashSet<String> = existing.into_iter().map(|r| r.hash).collect();
    recorded.extend(
        manifest
            .iter()
            .filter(|m| backfilled.contains(&m.tag))
            .map(|m| m.hash.clone()),
    );

    info("Running database migrations...");
    match engine::apply_pending(&mut pool.conn, &manifest, &recorded) {
        Ok(applied) => {
            if applied.is_empty() {
                success("Already up to date.");
            } else {
                success(format!("Migrations complete ({} applied).", applied.len()));
            }
            Ok(BootstrapReport {
                backfilled,
                applied,
            })
        }
        Err(e @ AppError::MigrationApply { .. })
            if opts.on_apply_failure == ApplyFailurePolicy::Tolerant =>
        {
            error(format!("{}", e));
            warning("Tolerant mode: not blocking the deploy on a failed migration.");
            Ok(BootstrapReport {
                backfilled,
                applied: Vec::new(),
            })
        }
        Err(e) => Err(e),
    }
}
