use reestr_core::db::migrations::latest_version;
use reestr_core::MigrationRunner;
use rusqlite::Connection;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use std::thread;

#[test]
fn ensure_creates_parent_directory_and_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("reestr.db");

    let runner = MigrationRunner::new();
    assert!(!runner.is_done());
    runner.ensure(&path).unwrap();
    assert!(runner.is_done());

    assert_eq!(schema_version(&path), latest_version());
}

#[test]
fn ensure_is_idempotent_in_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reestr.db");

    let runner = MigrationRunner::new();
    runner.ensure(&path).unwrap();
    runner.ensure(&path).unwrap();

    assert_eq!(schema_version(&path), latest_version());
}

#[test]
fn concurrent_first_callers_all_observe_success() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reestr.db");
    let runner = Arc::new(MigrationRunner::new());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let runner = Arc::clone(&runner);
            let path = path.clone();
            thread::spawn(move || runner.ensure(&path))
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    assert!(runner.is_done());
    assert_eq!(schema_version(&path), latest_version());
}

#[test]
fn failed_ensure_leaves_runner_retryable() {
    let dir = tempfile::tempdir().unwrap();

    // A regular file in the parent position makes directory creation fail.
    let blocker = dir.path().join("blocker");
    File::create(&blocker).unwrap();
    let bad_path = blocker.join("reestr.db");

    let runner = MigrationRunner::new();
    runner.ensure(&bad_path).unwrap_err();
    assert!(!runner.is_done());

    let good_path = dir.path().join("reestr.db");
    runner.ensure(&good_path).unwrap();
    assert!(runner.is_done());
    assert_eq!(schema_version(&good_path), latest_version());
}

#[test]
fn second_runner_accepts_already_migrated_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reestr.db");

    MigrationRunner::new().ensure(&path).unwrap();
    MigrationRunner::new().ensure(&path).unwrap();

    assert_eq!(schema_version(&path), latest_version());
}

fn schema_version(path: &Path) -> u32 {
    let conn = Connection::open(path).unwrap();
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}
