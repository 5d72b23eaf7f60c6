//! Integration tests for the goal file.
//!
//! These tests verify the on-disk format and the save, load and reset
//! commands, including recovery from malformed files.

mod common;

use common::TestEnv;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_goal_file_format() {
    let env = TestEnv::new();
    env.ql()
        .args(["create", "simple", "Read scriptures", "-d", "daily", "-p", "100"])
        .assert()
        .success();
    env.ql()
        .args([
            "create", "checklist", "Exercise", "-d", "gym", "-p", "50", "--target", "3",
            "--bonus", "500",
        ])
        .assert()
        .success();
    env.ql()
        .args(["create", "eternal", "Pray", "-d", "daily", "-p", "25"])
        .assert()
        .success();
    env.ql()
        .args(["create", "negative", "Junk food", "-d", "snacks", "-p", "30"])
        .assert()
        .success();
    env.ql().args(["record", "1"]).assert().success();
    env.ql().args(["record", "2"]).assert().success();

    let contents = fs::read_to_string(env.data_file()).unwrap();
    assert_eq!(
        contents,
        "150\n\
         Simple|Read scriptures|daily|100|True\n\
         Checklist|Exercise|gym|50|3|500|1\n\
         Eternal|Pray|daily|25\n\
         Negative|Junk food|snacks|30\n"
    );
}

#[test]
fn test_reads_hand_written_file() {
    let env = TestEnv::new();
    fs::write(
        env.data_file(),
        "40\nSimple|Walk|outside|10|false\nChecklist|Read|books|5|2|20|1\n",
    )
    .unwrap();

    let recorded = env.ql_json(&["record", "2"]);
    assert_eq!(recorded["points"], 25);
    assert_eq!(recorded["completed"], true);
    assert_eq!(recorded["score"], 65);
}

#[test]
fn test_malformed_record_is_skipped() {
    let env = TestEnv::new();
    fs::write(
        env.data_file(),
        "10\nEternal|Pray|daily|25\nChecklist|Exercise|gym|50\nNegative|Junk|snacks|5\n",
    )
    .unwrap();

    let list = env.ql_json(&["list"]);
    assert_eq!(list["count"], 2);
    assert_eq!(list["score"], 10);
    assert_eq!(list["goals"][1]["name"], "Junk");

    env.ql()
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::contains("line 3"));
}

#[test]
fn test_invalid_utf8_record_does_not_block_commands() {
    let env = TestEnv::new();
    fs::write(
        env.data_file(),
        b"10\nEternal|Pray|daily|25\nEternal|Bad\xFF|x|5\nNegative|Junk|snacks|5\n",
    )
    .unwrap();

    let list = env.ql_json(&["list"]);
    assert_eq!(list["count"], 2);

    env.ql()
        .args(["record", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("line 3: skipped record: not valid UTF-8"));
    assert_eq!(env.ql_json(&["score"])["score"], 35);
}

#[test]
fn test_invalid_score_starts_from_zero() {
    let env = TestEnv::new();
    fs::write(env.data_file(), "lots\nEternal|Pray|daily|25\n").unwrap();

    let status = env.ql_json(&[]);
    assert_eq!(status["score"], 0);
    assert_eq!(status["goals"], 1);
}

#[test]
fn test_save_and_load() {
    let env = TestEnv::new();
    env.ql()
        .args(["create", "eternal", "Pray", "-p", "25"])
        .assert()
        .success();
    env.ql().args(["record", "1"]).assert().success();

    let backup = env.data_path().join("backup.txt");
    let saved = env.ql_json(&["save", backup.to_str().unwrap()]);
    assert_eq!(saved["goals"], 1);
    assert_eq!(saved["score"], 25);
    assert_eq!(
        fs::read_to_string(&backup).unwrap(),
        "25\nEternal|Pray||25\n"
    );

    let reset = env.ql_json(&["reset"]);
    assert_eq!(reset["removed"], 1);
    assert_eq!(env.ql_json(&["score"])["score"], 0);

    env.ql()
        .args(["-H", "load", backup.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 goals, 25 points)"));
    assert_eq!(env.ql_json(&["score"])["score"], 25);
}

#[test]
fn test_load_missing_file_starts_fresh() {
    let env = TestEnv::new();
    env.ql()
        .args(["create", "eternal", "Pray", "-p", "25"])
        .assert()
        .success();

    let missing = env.data_path().join("nope.txt");
    env.ql()
        .args(["-H", "load", missing.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No saved goals found at",
        ))
        .stdout(predicate::str::contains("Starting with a new quest!"));

    assert_eq!(env.ql_json(&["list"])["count"], 0);
}

#[test]
fn test_load_reports_warnings() {
    let env = TestEnv::new();
    let source = env.data_path().join("import.txt");
    fs::write(&source, "5\nBogus|thing\nEternal|Pray|daily|25\n").unwrap();

    let loaded = env.ql_json(&["load", source.to_str().unwrap()]);
    assert_eq!(loaded["found"], true);
    assert_eq!(loaded["loaded"], 1);
    assert_eq!(
        loaded["warnings"][0],
        "line 2: skipped record: unknown goal type 'Bogus'"
    );
}

#[test]
fn test_save_to_missing_directory_fails() {
    let env = TestEnv::new();
    let target = env.data_path().join("no-such-dir").join("out.txt");
    env.ql()
        .args(["save", target.to_str().unwrap()])
        .assert()
        .failure()
        .code(1);
    assert!(!target.exists());
}

#[test]
fn test_file_flag_selects_goal_file() {
    let env = TestEnv::new();
    let other = env.data_path().join("other.txt");
    env.ql()
        .args(["-f", other.to_str().unwrap(), "create", "eternal", "Pray"])
        .assert()
        .success();

    assert!(other.exists());
    assert!(!env.data_file().exists());
}

#[test]
fn test_file_env_var_selects_goal_file() {
    let env = TestEnv::new();
    let other = env.data_path().join("env.txt");
    env.ql()
        .env("QL_FILE", &other)
        .args(["create", "eternal", "Pray"])
        .assert()
        .success();

    assert!(other.exists());
    assert!(!env.data_file().exists());
}
