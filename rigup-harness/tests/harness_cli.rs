//! Binary-level tests for the harness front end. Nothing here touches
//! Docker; every case exits before a container would be spawned.

use assert_cmd::Command;
use predicates::prelude::*;

fn harness() -> Command {
    Command::cargo_bin("rigup-harness").expect("rigup-harness binary")
}

#[test]
fn help_exits_zero_and_lists_subcommands() {
    harness()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("all-prefixes"));
}

#[test]
fn missing_subcommand_is_a_usage_error() {
    harness()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    harness().arg("bogus").assert().failure();
}

#[test]
fn unknown_step_name_exits_one() {
    harness()
        .args(["step", "nope"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown step 'nope'"));
}

#[test]
fn empty_prefix_list_exits_one() {
    harness()
        .args(["prefix", ","])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("empty step list"));
}
