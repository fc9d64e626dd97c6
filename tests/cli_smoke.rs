//! Integration tests for the `estimator` CLI surface.

use assert_cmd::Command;
use predicates::prelude::*;

fn estimator_cmd() -> Command {
    Command::cargo_bin("estimator-cli").expect("estimator-cli binary not found")
}

#[test]
fn test_help_lists_commands() {
    estimator_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("sessions"));
}

#[test]
fn test_version_flag() {
    estimator_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("estimator"));
}

#[test]
fn test_ask_requires_a_message() {
    estimator_cmd()
        .arg("ask")
        .assert()
        .failure()
        .stderr(predicate::str::contains("MESSAGE"));
}

#[test]
fn test_ask_help_shows_attachment_flag() {
    estimator_cmd()
        .args(["ask", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--attachment-url"))
        .stdout(predicate::str::contains("--session"));
}

#[test]
fn test_sessions_show_requires_an_id() {
    estimator_cmd()
        .args(["sessions", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ID"));
}

#[test]
fn test_unknown_command_fails() {
    estimator_cmd().arg("frobnicate").assert().failure();
}
