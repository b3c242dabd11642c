//! CLI integration tests
//!
//! Exercise the offline subcommands through the built binary.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

fn wikisync(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wikisync"))
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_bits_extracts_range() {
    let output = wikisync(&["bits", "90", "1", "3"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "5");
}

#[test]
fn test_bits_full_word_keeps_raw_value() {
    let output = wikisync(&["bits", "-2", "0", "31"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "-2");
}

#[test]
fn test_bits_rejects_inverted_range() {
    let output = wikisync(&["bits", "90", "3", "1"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[test]
fn test_diff_prints_summary_of_changes() {
    // GIVEN a baseline and a snapshot where varbit 10 went from 2 to 3
    let dir = TempDir::new().unwrap();
    let old = write(&dir, "old.json", r#"{"varb": {"10": 2, "11": 1}}"#);
    let new = write(
        &dir,
        "new.json",
        r#"{"varb": {"10": 3, "11": 1}, "level": {"Attack": 60}}"#,
    );

    // WHEN diffing them
    let output = wikisync(&[
        "diff",
        "--new",
        new.to_str().unwrap(),
        "--old",
        old.to_str().unwrap(),
    ]);

    // THEN only the changed entries are reported
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("2 changed field(s)"), "got: {}", stdout);
    assert!(stdout.contains("10=3"));
    assert!(!stdout.contains("11=1"));
    assert!(stdout.contains("Attack=60"));
}

#[test]
fn test_diff_json_output_is_a_delta() {
    let dir = TempDir::new().unwrap();
    let old = write(&dir, "old.json", r#"{"varp": {"281": 4}}"#);
    let new = write(&dir, "new.json", r#"{"varp": {"281": 6}}"#);

    let output = wikisync(&[
        "diff",
        "--new",
        new.to_str().unwrap(),
        "--old",
        old.to_str().unwrap(),
        "--json",
    ]);

    assert!(output.status.success());
    let delta: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        delta,
        serde_json::json!({"varb": {}, "varp": {"281": 6}, "level": {}})
    );
}

#[test]
fn test_diff_against_identical_snapshot_reports_no_changes() {
    let dir = TempDir::new().unwrap();
    let snapshot = write(&dir, "snap.json", r#"{"varb": {"10": 2}}"#);

    let output = wikisync(&[
        "diff",
        "--new",
        snapshot.to_str().unwrap(),
        "--old",
        snapshot.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "No changes.\n");
}

#[test]
fn test_diff_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.json");

    let output = wikisync(&["diff", "--new", missing.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot read"));
}
