//! Command-line tests for startup failures
//!
//! These tests run the built binary and check that bad input is rejected
//! before any output is opened or any page is fetched.

use std::process::{Command, Output};
use tempfile::TempDir;

fn sitewalk(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sitewalk"))
        .args(args)
        .output()
        .expect("Failed to run sitewalk")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_unparseable_start_url_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("crawl.db");
    let db = db_path.to_str().unwrap();

    let output = sitewalk(&["not a url", "--format", "sqlite", "--database", db]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid start URL 'not a url'"));
    assert!(output.stdout.is_empty());
    assert!(!db_path.exists());
}

#[test]
fn test_relative_start_url_exits_nonzero() {
    let output = sitewalk(&["/home"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid start URL"));
}

#[test]
fn test_non_http_start_url_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("crawl.db");
    let db = db_path.to_str().unwrap();

    let output = sitewalk(&[
        "ftp://example.com/files",
        "--format",
        "sqlite",
        "--database",
        db,
    ]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Cannot crawl 'ftp://example.com/files'"));
    assert!(!db_path.exists());
}

#[test]
fn test_invalid_worker_count_exits_nonzero() {
    let output = sitewalk(&["http://localhost/home", "--workers", "0"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid configuration"));
}

#[test]
fn test_dry_run_succeeds_without_output() {
    let output = sitewalk(&["http://localhost:9/home", "--dry-run"]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}
