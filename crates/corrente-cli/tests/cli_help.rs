//! Smoke tests for argument parsing.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_lists_command_groups() {
    cargo_bin_cmd!("corrente")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("donations"))
        .stdout(predicate::str::contains("admin"))
        .stdout(predicate::str::contains("register"));
}

#[test]
fn test_admin_help_lists_queue_commands() {
    cargo_bin_cmd!("corrente")
        .args(["admin", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("queue-add"))
        .stdout(predicate::str::contains("monthly-pull"));
}

#[test]
fn test_unknown_command_fails() {
    cargo_bin_cmd!("corrente")
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
