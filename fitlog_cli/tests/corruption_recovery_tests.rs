//! Corruption recovery tests for the fitlog binary.
//!
//! These tests verify the system can handle:
//! - A corrupted store file
//! - Corrupted values under individual keys
//! - Hand-edited records with odd shapes

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn cli(data_dir: &Path, today: &str) -> Command {
    let mut cmd = Command::cargo_bin("fitlog").expect("Failed to find fitlog binary");
    cmd.arg("--data-dir").arg(data_dir).arg("--today").arg(today);
    cmd
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn write_store(data_dir: &Path, values: serde_json::Value) {
    fs::write(data_dir.join("store.json"), values.to_string()).expect("Failed to write store");
}

#[test]
fn test_corrupted_store_file() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::write(data_dir.join("store.json"), "{ invalid json }}}}").unwrap();

    // Reads fall back to defaults.
    cli(data_dir, "2024-01-10")
        .arg("today")
        .assert()
        .success()
        .stdout(predicate::str::contains("Consumed:  0 / 2000 kcal"));

    // Writing replaces the damaged file with a valid one.
    cli(data_dir, "2024-01-10")
        .args(["meal", "add", "--name", "Toast", "--calories", "200"])
        .assert()
        .success();

    let text = fs::read_to_string(data_dir.join("store.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(parsed.get("meals").is_some());

    // The damaged bytes are kept next to the new store.
    let backup = fs::read_to_string(data_dir.join("store.json.corrupt")).unwrap();
    assert_eq!(backup, "{ invalid json }}}}");
}

#[test]
fn test_null_weight_record_keeps_history() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    write_store(
        data_dir,
        serde_json::json!({
            "weightEntries": r#"[{"date":"2024-01-01","weight":90},{"date":"2024-01-02","weight":null},{"date":"2024-01-03","weight":88}]"#,
        }),
    );

    cli(data_dir, "2024-01-04")
        .args(["weight", "log", "87"])
        .assert()
        .success();

    cli(data_dir, "2024-01-04")
        .arg("progress")
        .assert()
        .success()
        .stdout(predicate::str::contains("Current weight: 87.0 kg"))
        .stdout(predicate::str::contains("Change:         -3.0 kg"));
}

#[test]
fn test_corrupted_value_under_one_key() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    write_store(
        data_dir,
        serde_json::json!({
            "meals": "{ not json",
            "dailyCalorieGoal": "1500",
        }),
    );

    cli(data_dir, "2024-01-10")
        .arg("today")
        .assert()
        .success()
        .stdout(predicate::str::contains("Consumed:  0 / 1500 kcal"));
}

#[test]
fn test_hand_edited_records_are_read_leniently() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    write_store(
        data_dir,
        serde_json::json!({
            "meals": r#"{"2024-01-01":[{"calories":"300"},{"calories":"abc"},{"calories":150,"type":"brunch"}]}"#,
            "workouts": r#"{"Monday":[{"calories":"200"}]}"#,
            "dailyCalorieGoal": "0",
        }),
    );

    // Zero goal is guarded: no division, nothing remaining.
    cli(data_dir, "2024-01-01")
        .arg("today")
        .assert()
        .success()
        .stdout(predicate::str::contains("Consumed:  450 / 0 kcal (0%)"))
        .stdout(predicate::str::contains("Other"));

    // 2024-01-01 is a Monday.
    cli(data_dir, "2024-01-01")
        .arg("week")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total consumed: 450 kcal"))
        .stdout(predicate::str::contains("Total burned:   200 kcal"));
}
