//! Integration tests for the lastci binary that need no network access.

// Integration tests can use unwrap/expect for cleaner assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn lastci() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("lastci").unwrap();
    cmd.env_remove("GITHUB_TOKEN")
        .env_remove("GITHUB_SHA")
        .env_remove("GITHUB_REPOSITORY")
        .env_remove("LASTCI_BUILD_DIR")
        .env_remove("LASTCI_KEEP")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_publish_without_token_exits_with_config_error() {
    lastci()
        .args(["publish", "--dir", "does-not-matter"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("token"));
}

#[test]
fn test_publish_empty_dir_reports_no_files() {
    let temp = TempDir::new().unwrap();

    lastci()
        .env("GITHUB_TOKEN", "ghp_test")
        .env("GITHUB_SHA", "0123456789abcdef")
        .env("GITHUB_REPOSITORY", "octo/kernel")
        .arg("publish")
        .arg("--dir")
        .arg(temp.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No files to release"));
}

#[test]
fn test_publish_dry_run_json() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("kernel.img"), b"kernel").unwrap();
    std::fs::write(temp.path().join("dtbo.img"), b"dtbo").unwrap();

    lastci()
        .env("GITHUB_TOKEN", "ghp_test")
        .args(["--json", "publish", "--dry-run", "--repo", "octo/kernel"])
        .args(["--sha", "0123456789abcdef", "--kernelsu"])
        .arg("--dir")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""status":"ok""#))
        .stdout(predicate::str::contains(r#""tag":"last-ci-0123456789abcdef""#))
        .stdout(predicate::str::contains("dtbo.img"))
        .stdout(predicate::str::contains("kernel.img"));
}

#[test]
fn test_cleanup_never_fails() {
    lastci()
        .args(["cleanup", "--keep", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("warning: cleanup stopped early"));
}

#[test]
fn test_json_error_envelope() {
    lastci()
        .args(["--json", "publish"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains(r#""status":"error""#))
        .stdout(predicate::str::contains(r#""code":"config""#));
}
