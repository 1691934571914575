#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::fs;
use std::path::Path;

/// Build a sqlboot command with an isolated HOME so a developer's real
/// config file never leaks into a test run.
pub fn boot(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("sqlboot");
    cmd.env("HOME", home);
    cmd.env("APPDATA", home);
    cmd.env_remove("DATABASE_URL");
    cmd.env_remove("SQLBOOT_DATABASE_URL");
    cmd
}

/// Write a migrations directory: meta/_journal.json plus one .sql per tag.
pub fn write_pack(dir: &Path, entries: &[(&str, i64, &str)]) {
    fs::create_dir_all(dir.join("meta")).unwrap();

    let journal: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(i, (tag, when, _))| format!(r#"{{"idx":{},"when":{},"tag":"{}"}}"#, i, when, tag))
        .collect();

    fs::write(
        dir.join("meta").join("_journal.json"),
        format!(r#"{{"entries":[{}]}}"#, journal.join(",")),
    )
    .unwrap();

    for (tag, _, sql) in entries {
        fs::write(dir.join(format!("{}.sql", tag)), sql).unwrap();
    }
}

/// Fetch (tag, hash, created_at) rows from the tracking table.
pub fn tracking_rows(db_path: &Path) -> Vec<(String, String, i64)> {
    let conn = rusqlite::Connection::open(db_path).expect("open db");
    let mut stmt = conn
        .prepare("SELECT tag, hash, created_at FROM _sqlboot_migrations ORDER BY tag ASC")
        .expect("tracking table");
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .unwrap()
        .collect::<rusqlite::Result<Vec<_>>>()
        .unwrap();
    rows
}

pub const INIT_SQL: &str =
    "CREATE TABLE model_prices (id INTEGER PRIMARY KEY, price REAL NOT NULL);";
pub const ADD_COL_SQL: &str = "ALTER TABLE model_prices ADD COLUMN currency TEXT;";
