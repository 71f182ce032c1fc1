#![allow(clippy::unwrap_used)]
//! CLI smoke tests to verify the binary starts and answers the
//! informational flags without opening a window or loading a model.

use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
fn kotrans() -> Command {
    Command::cargo_bin("kotrans").unwrap()
}

#[test]
fn test_help_displays_usage() {
    kotrans()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Korean-to-English"))
        .stdout(predicate::str::contains("config.toml"))
        .stdout(predicate::str::contains("max_length"));
}

#[test]
fn test_version_displays_version() {
    kotrans()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_flag_rejected() {
    kotrans()
        .arg("--to")
        .arg("ja")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument"));
}
