use predicates::str::contains;
use tempfile::TempDir;

mod common;
use common::{ADD_COL_SQL, INIT_SQL, boot, tracking_rows, write_pack};

use sqlboot::manifest::compute_hash;

#[test]
fn test_up_applies_all_then_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("migrations");
    let db = tmp.path().join("app.sqlite");

    write_pack(
        &dir,
        &[("0000_init", 1000, INIT_SQL), ("0001_add_col", 2000, ADD_COL_SQL)],
    );

    boot(tmp.path())
        .args(["--db", db.to_str().unwrap(), "up", "--dir", dir.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Applied '0000_init'"))
        .stdout(contains("Applied '0001_add_col'"))
        .stdout(contains("Migrations complete"));

    let rows = tracking_rows(&db);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].1, compute_hash(INIT_SQL));
    assert_eq!(rows[1].1, compute_hash(ADD_COL_SQL));

    // Second run performs no inserts and still exits 0.
    boot(tmp.path())
        .args(["--db", db.to_str().unwrap(), "up", "--dir", dir.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Already up to date"));

    assert_eq!(tracking_rows(&db).len(), 2);
}

#[test]
fn test_single_backfill_marks_preexisting_schema() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("migrations");
    let db = tmp.path().join("app.sqlite");

    write_pack(
        &dir,
        &[("0000_init", 1000, INIT_SQL), ("0001_add_col", 2000, ADD_COL_SQL)],
    );

    // Schema created out-of-band: the sentinel table exists but nothing is
    // tracked. Re-running 0000_init's CREATE TABLE would fail, so a clean
    // exit proves the record was backfilled instead of re-applied.
    let conn = rusqlite::Connection::open(&db).unwrap();
    conn.execute_batch(INIT_SQL).unwrap();
    drop(conn);

    boot(tmp.path())
        .args([
            "--db",
            db.to_str().unwrap(),
            "up",
            "--dir",
            dir.to_str().unwrap(),
            "--sentinel",
            "model_prices",
        ])
        .assert()
        .success()
        .stdout(contains("Marked '0000_init' as applied"))
        .stdout(contains("Applied '0001_add_col'"));

    let rows = tracking_rows(&db);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].0, "0000_init");
    assert_eq!(rows[0].1, compute_hash(INIT_SQL));
    assert_eq!(rows[0].2, 1000);

    // Re-run: the matching hash must not be backfilled twice.
    boot(tmp.path())
        .args([
            "--db",
            db.to_str().unwrap(),
            "up",
            "--dir",
            dir.to_str().unwrap(),
            "--sentinel",
            "model_prices",
        ])
        .assert()
        .success()
        .stdout(contains("Already up to date"));

    assert_eq!(tracking_rows(&db).len(), 2);
}

#[test]
fn test_batch_backfill_marks_whole_initial_prefix() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("migrations");
    let db = tmp.path().join("app.sqlite");

    let seed_sql = "INSERT INTO model_prices (id, price) VALUES (1, 2.5);";
    write_pack(
        &dir,
        &[
            ("0000_init", 1000, INIT_SQL),
            ("0000_seed", 1000, seed_sql),
            ("0001_add_col", 2000, ADD_COL_SQL),
        ],
    );

    let conn = rusqlite::Connection::open(&db).unwrap();
    conn.execute_batch(INIT_SQL).unwrap();
    drop(conn);

    boot(tmp.path())
        .args([
            "--db",
            db.to_str().unwrap(),
            "up",
            "--dir",
            dir.to_str().unwrap(),
            "--sentinel",
            "model_prices",
            "--backfill",
            "batch",
        ])
        .assert()
        .success();

    let rows = tracking_rows(&db);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].0, "0000_init");
    assert_eq!(rows[1].0, "0000_seed");
    assert_eq!(rows[1].2, 1000);

    // Backfill marks without executing: the seed INSERT must not have run.
    let conn = rusqlite::Connection::open(&db).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM model_prices", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn test_only_unrecorded_migrations_are_applied() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("migrations");
    let db = tmp.path().join("app.sqlite");

    write_pack(
        &dir,
        &[("0000_init", 1000, INIT_SQL), ("0001_add_col", 2000, ADD_COL_SQL)],
    );

    // Simulate a previous deploy that applied and recorded 0000_init.
    let conn = rusqlite::Connection::open(&db).unwrap();
    conn.execute_batch(INIT_SQL).unwrap();
    conn.execute_batch(
        "CREATE TABLE _sqlboot_migrations (id INTEGER PRIMARY KEY AUTOINCREMENT, tag TEXT NOT NULL, hash TEXT NOT NULL, created_at BIGINT NOT NULL);",
    )
    .unwrap();
    conn.execute(
        "INSERT INTO _sqlboot_migrations (tag, hash, created_at) VALUES (?1, ?2, ?3)",
        rusqlite::params!["0000_init", compute_hash(INIT_SQL), 1000i64],
    )
    .unwrap();
    drop(conn);

    let assert = boot(tmp.path())
        .args(["--db", db.to_str().unwrap(), "up", "--dir", dir.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Applied '0001_add_col'"));
    let out = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(!out.contains("Applied '0000_init'"));

    let rows = tracking_rows(&db);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].0, "0001_add_col");
}

#[test]
fn test_strict_mode_fails_on_bad_sql() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("migrations");
    let db = tmp.path().join("app.sqlite");

    write_pack(
        &dir,
        &[
            ("0000_init", 1000, INIT_SQL),
            ("0001_broken", 2000, "THIS IS NOT SQL;"),
        ],
    );

    boot(tmp.path())
        .args(["--db", db.to_str().unwrap(), "up", "--dir", dir.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("0001_broken"));

    // The failed migration left no tracking row behind.
    let rows = tracking_rows(&db);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, "0000_init");
}

#[test]
fn test_tolerant_mode_exits_zero_on_bad_sql() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("migrations");
    let db = tmp.path().join("app.sqlite");

    write_pack(
        &dir,
        &[
            ("0000_init", 1000, INIT_SQL),
            ("0001_broken", 2000, "THIS IS NOT SQL;"),
        ],
    );

    boot(tmp.path())
        .args([
            "--db",
            db.to_str().unwrap(),
            "up",
            "--dir",
            dir.to_str().unwrap(),
            "--tolerant",
        ])
        .assert()
        .success()
        .stdout(contains("Tolerant mode"));

    // Still no tracking row for the failed tag.
    let rows = tracking_rows(&db);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, "0000_init");
}

#[test]
fn test_missing_migration_file_fails() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("migrations");
    let db = tmp.path().join("app.sqlite");

    write_pack(&dir, &[("0000_init", 1000, INIT_SQL)]);
    std::fs::remove_file(dir.join("0000_init.sql")).unwrap();

    boot(tmp.path())
        .args(["--db", db.to_str().unwrap(), "up", "--dir", dir.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("Cannot read migration file"));
}

#[test]
fn test_database_url_env_is_honored() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("migrations");
    let db = tmp.path().join("from_env.sqlite");

    write_pack(&dir, &[("0000_init", 1000, INIT_SQL)]);

    boot(tmp.path())
        .env("DATABASE_URL", db.to_str().unwrap())
        .args(["up", "--dir", dir.to_str().unwrap()])
        .assert()
        .success();

    assert_eq!(tracking_rows(&db).len(), 1);
}

#[test]
fn test_sqlboot_database_url_wins_over_database_url() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("migrations");
    let preferred = tmp.path().join("preferred.sqlite");
    let fallback = tmp.path().join("fallback.sqlite");

    write_pack(&dir, &[("0000_init", 1000, INIT_SQL)]);

    boot(tmp.path())
        .env("SQLBOOT_DATABASE_URL", preferred.to_str().unwrap())
        .env("DATABASE_URL", fallback.to_str().unwrap())
        .args(["up", "--dir", dir.to_str().unwrap()])
        .assert()
        .success();

    assert_eq!(tracking_rows(&preferred).len(), 1);
    assert!(!fallback.exists());
}
