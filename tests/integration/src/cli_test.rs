//! CLI smoke tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn epm() -> Command {
    Command::cargo_bin("epm").unwrap()
}

#[test]
fn help_lists_commands() {
    epm()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("uninstall"));
}

#[test]
fn status_with_empty_data_dir_reports_no_engines() {
    let temp = TempDir::new().unwrap();
    epm()
        .args(["status", "--data-dir"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No engine installations found."));
}

#[test]
fn status_json_is_valid_json() {
    let temp = TempDir::new().unwrap();
    let output = epm()
        .args(["status", "--json", "--data-dir"])
        .arg(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(parsed.is_array());
}

#[test]
fn install_of_unknown_version_fails_with_message() {
    let temp = TempDir::new().unwrap();
    epm()
        .args(["install", "9.9", "--data-dir"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No engine installation found"));
}

#[test]
fn roots_add_list_remove_round_trip() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("engines");
    std::fs::create_dir(&root).unwrap();

    epm()
        .args(["roots", "add"])
        .arg(&root)
        .args(["--data-dir"])
        .arg(temp.path())
        .assert()
        .success();

    epm()
        .args(["roots", "list", "--data-dir"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("engines"));

    epm()
        .args(["roots", "remove"])
        .arg(&root)
        .args(["--data-dir"])
        .arg(temp.path())
        .assert()
        .success();

    epm()
        .args(["roots", "list", "--data-dir"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No custom roots configured."));
}
