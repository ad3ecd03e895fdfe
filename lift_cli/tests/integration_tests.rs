//! Integration tests for the lift binary.
//!
//! These tests verify end-to-end behavior including:
//! - Listing and selecting workout days
//! - Running sessions (auto-complete and piped stdin)
//! - Workout logging, history and CSV export

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// CLI command isolated from the user's real config
fn cli(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lift"));
    cmd.env("XDG_CONFIG_HOME", temp_dir.path().join("config"))
        .arg("--data-dir")
        .arg(temp_dir.path().join("data"));
    cmd
}

fn read_wal(data_dir: &Path) -> Vec<Value> {
    let content = fs::read_to_string(data_dir.join("wal/workouts.wal")).expect("read wal");
    content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("valid json line"))
        .collect()
}

/// Catalog with one two-exercise superset day and one malformed day
fn write_superset_catalog(temp_dir: &TempDir) -> PathBuf {
    let path = temp_dir.path().join("programs.json");
    let json = r#"{
        "days": [
            {
                "id": "pair",
                "name": "Pair Day",
                "sections": [
                    {
                        "name": "Main",
                        "exercises": [
                            {
                                "exercise_slot": "bench_press",
                                "category_slot": "push",
                                "superset_group": "1",
                                "sets": [
                                    { "set_number": 1, "target_reps": "5" },
                                    { "set_number": 2, "target_reps": "5" }
                                ]
                            },
                            {
                                "exercise_slot": "barbell_row",
                                "category_slot": "pull",
                                "superset_group": "1",
                                "sets": [
                                    { "set_number": 1, "target_reps": "8" },
                                    { "set_number": 2, "target_reps": "8" }
                                ]
                            }
                        ]
                    }
                ]
            },
            {
                "id": "broken",
                "name": "Broken Day",
                "sections": [
                    {
                        "name": "Main",
                        "exercises": [
                            { "exercise_slot": "plank", "category_slot": "core", "sets": [] }
                        ]
                    }
                ]
            }
        ]
    }"#;
    fs::write(&path, json).unwrap();
    path
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout session tracker"));
}

#[test]
fn test_days_lists_default_programs() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("days")
        .assert()
        .success()
        .stdout(predicate::str::contains("lower_a"))
        .stdout(predicate::str::contains("Upper A"))
        .stdout(predicate::str::contains("conditioning"));
}

#[test]
fn test_auto_complete_logs_workout() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    cli(&temp_dir)
        .args(["run", "--day", "lower_a", "--auto-complete", "--user", "tester"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout logged"));

    let logs = read_wal(&data_dir);
    assert_eq!(logs.len(), 1);

    let log = &logs[0];
    assert_eq!(log["day_id"], "lower_a");
    assert_eq!(log["user_id"], "tester");

    let exercises = log["exercises"].as_array().unwrap();
    assert_eq!(exercises.len(), 4);
    let total_sets: usize = exercises
        .iter()
        .map(|e| e["sets"].as_array().unwrap().len())
        .sum();
    assert_eq!(total_sets, 12);
}

#[test]
fn test_unknown_day_fails_without_logging() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .args(["run", "--day", "nope", "--auto-complete"])
        .assert()
        .failure();

    assert!(!temp_dir.path().join("data/wal/workouts.wal").exists());
}

#[test]
fn test_malformed_day_is_not_selectable() {
    let temp_dir = setup_test_dir();
    let catalog = write_superset_catalog(&temp_dir);

    cli(&temp_dir)
        .arg("--catalog")
        .arg(&catalog)
        .arg("days")
        .assert()
        .success()
        .stdout(predicate::str::contains("pair"))
        .stdout(predicate::str::contains("broken").not());

    cli(&temp_dir)
        .arg("--catalog")
        .arg(&catalog)
        .args(["run", "--day", "broken", "--auto-complete"])
        .assert()
        .failure();
}

#[test]
fn test_interactive_superset_session() {
    let temp_dir = setup_test_dir();
    let catalog = write_superset_catalog(&temp_dir);

    // bench, row, rest (skip), bench, row
    cli(&temp_dir)
        .arg("--catalog")
        .arg(&catalog)
        .args(["run", "--day", "pair"])
        .write_stdin("80 5\n60 8\ns\n80 5\n60 7\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("superset 2/2"))
        .stdout(predicate::str::contains("Workout logged! (4 sets)"));

    let logs = read_wal(&temp_dir.path().join("data"));
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["exercises"][1]["exercise_id"], "barbell_row");
    let row_sets = logs[0]["exercises"][1]["sets"].as_array().unwrap();
    assert_eq!(row_sets[1]["reps"], 7);
    assert_eq!(row_sets[1]["weight"], 60.0);
}

#[test]
fn test_interactive_without_supersets_rests_between_sets() {
    let temp_dir = setup_test_dir();
    let catalog = write_superset_catalog(&temp_dir);

    // bench, rest, bench, rest, row, rest, row
    cli(&temp_dir)
        .arg("--catalog")
        .arg(&catalog)
        .args(["run", "--day", "pair", "--no-superset"])
        .write_stdin("80 5\ns\n82.5 5\ns\n60 8\ns\n60 8\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout logged! (4 sets)"));

    let logs = read_wal(&temp_dir.path().join("data"));
    assert_eq!(logs[0]["exercises"][0]["sets"][1]["weight"], 82.5);
}

#[test]
fn test_quit_cancels_without_logging() {
    let temp_dir = setup_test_dir();
    let catalog = write_superset_catalog(&temp_dir);

    cli(&temp_dir)
        .arg("--catalog")
        .arg(&catalog)
        .args(["run", "--day", "pair"])
        .write_stdin("80 5\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing logged"));

    assert!(!temp_dir.path().join("data/wal/workouts.wal").exists());
}

#[test]
fn test_closed_stdin_cancels() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .args(["run", "--day", "upper_a"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing logged"));
}

#[test]
fn test_history_and_export() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    cli(&temp_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No workouts logged"));

    for day in ["upper_a", "conditioning"] {
        cli(&temp_dir)
            .args(["run", "--day", day, "--auto-complete"])
            .assert()
            .success();
    }

    cli(&temp_dir)
        .args(["history", "--day", "conditioning"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Conditioning"))
        .stdout(predicate::str::contains("Upper A").not());

    cli(&temp_dir)
        .arg("export")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 24 sets"));

    let csv = fs::read_to_string(data_dir.join("workouts.csv")).unwrap();
    assert!(csv.starts_with("log_id,user_id,day_id"));
    assert_eq!(csv.lines().count(), 25);
}

#[test]
fn test_init_writes_default_config_once() {
    let temp_dir = setup_test_dir();
    let config_path = temp_dir.path().join("config/lift/config.toml");

    cli(&temp_dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config"));

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("superset_mode = true"));
    assert!(contents.contains("heavy_seconds = 180"));

    fs::write(&config_path, "[session]\nuser_id = \"kept\"\n").unwrap();
    cli(&temp_dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
    assert!(fs::read_to_string(&config_path).unwrap().contains("kept"));

    cli(&temp_dir)
        .args(["init", "--force"])
        .assert()
        .success();
    assert!(!fs::read_to_string(&config_path).unwrap().contains("kept"));
}
