//! End-to-end tests for CLI exit codes.
//!
//! These tests verify that the binaries return the exit codes documented in
//! [`devflow::exit_codes`]:
//!
//! - Exit code 0: Success
//! - Exit code 1: General error
//! - Exit code 2: Invalid command-line usage (handled by clap)
//! - Exit code 66: Explicitly requested clone list does not exist

mod common;
use common::prelude::*;

/// Exit code 0 is returned for --help.
#[test]
fn test_exit_code_help() {
    let fixture = TestFixture::new();

    fixture
        .refresh_skills()
        .arg("--help")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--clone-file"));
    fixture.prune_merged().arg("--help").assert().code(0);
    fixture.aws_mfa().arg("--help").assert().code(0);
    fixture
        .devbox_json()
        .arg("--help")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("--detailed"));
}

/// Exit code 0 is returned for --version.
#[test]
fn test_exit_code_version() {
    let mut cmd = cargo_bin_cmd!("refresh-skills");

    cmd.arg("--version")
        .assert()
        .code(0)
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

/// Exit code 2 is returned for an unknown flag.
#[test]
fn test_exit_code_usage_unknown_flag() {
    let fixture = TestFixture::new();

    fixture
        .refresh_skills()
        .arg("--frobnicate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--frobnicate"));
    fixture.prune_merged().arg("--frobnicate").assert().code(2);
}

/// Exit code 2 is returned for an invalid --color value.
#[test]
fn test_exit_code_usage_invalid_color() {
    let fixture = TestFixture::new();

    fixture
        .refresh_skills()
        .args(["--color", "sometimes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("auto"));
    fixture
        .devbox_json()
        .args(["--color", "sometimes"])
        .assert()
        .code(2);
}

/// `--color` accepts each documented value.
#[test]
fn test_color_values_are_accepted() {
    let fixture = TestFixture::new();

    for when in ["auto", "always", "never"] {
        fixture
            .prune_merged()
            .args(["--color", when, "--help"])
            .assert()
            .code(0);
    }
}

/// Exit code 2 is returned for a session duration outside the STS limits.
#[test]
fn test_exit_code_usage_duration_out_of_range() {
    let fixture = TestFixture::new();

    fixture
        .aws_mfa()
        .args(["--duration", "60"])
        .assert()
        .code(2);
    fixture
        .aws_mfa()
        .args(["--duration", "200000"])
        .assert()
        .code(2);
}

/// Exit code 66 is returned when the named clone list does not exist.
#[test]
fn test_exit_code_missing_clone_list() {
    let fixture = TestFixture::new();

    fixture
        .refresh_skills()
        .args(["--clone-file", "nope.list"])
        .assert()
        .code(66)
        .stderr(predicate::str::contains("Clone list not found"))
        .stderr(predicate::str::contains("hint:"));

    assert!(!fixture.root().exists());
}

/// Exit code 1 is returned when -C does not point into a repository.
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_exit_code_error_not_a_repository() {
    let fixture = TestFixture::new().with_dir("plain");

    fixture
        .prune_merged()
        .args(["-C", "plain"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Not a git repository"));
}
