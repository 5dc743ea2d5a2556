//! CLIの統合テスト
//!
//! ビルドされた `repo-sbom` バイナリを実行し、終了コードと出力を確認する。

#![cfg(unix)]

mod common;

use assert_cmd::Command;
use common::test_helpers::{
    create_stale_clone, scratch_dirs, unreachable_url, write_config, write_fake_tool, FakeTool,
};
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// `repo-sbom` with the fake generator and an isolated repos root
fn repo_sbom(temp_dir: &Path, tool: FakeTool) -> Command {
    let script = write_fake_tool(temp_dir, tool);
    let mut cmd = Command::cargo_bin("repo-sbom").unwrap();
    cmd.current_dir(temp_dir)
        .env_remove("RUST_LOG")
        .env_remove("REPO_SBOM_TIMEOUT_SECS")
        .arg("--no-color")
        .arg("--repos-root")
        .arg(temp_dir.join("repos"))
        .arg("--tool")
        .arg("sh")
        .arg("--tool-arg")
        .arg(script);
    cmd
}

#[test]
fn test_missing_arguments_exit_with_one() {
    Command::cargo_bin("repo-sbom")
        .unwrap()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));

    Command::cargo_bin("repo-sbom")
        .unwrap()
        .arg("repos.json")
        .assert()
        .code(1);
}

#[test]
fn test_help_and_version_succeed() {
    Command::cargo_bin("repo-sbom")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("OUTPUT_FOLDER"));

    Command::cargo_bin("repo-sbom")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("repo-sbom"));
}

#[test]
fn test_missing_config_file() {
    let temp_dir = TempDir::new().unwrap();

    repo_sbom(temp_dir.path(), FakeTool::Succeed)
        .arg(temp_dir.path().join("absent.json"))
        .arg(temp_dir.path().join("out"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration file not found"));

    assert!(!temp_dir.path().join("out").exists());
}

#[test]
fn test_empty_config_creates_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(temp_dir.path(), &[]);

    repo_sbom(temp_dir.path(), FakeTool::Succeed)
        .arg(&config)
        .arg(temp_dir.path().join("out"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No repositories configured"));

    assert!(!temp_dir.path().join("out").exists());
    assert!(!temp_dir.path().join("repos").exists());
}

#[test]
fn test_all_repositories_succeed() {
    let temp_dir = TempDir::new().unwrap();
    let repos_root = temp_dir.path().join("repos");
    create_stale_clone(&repos_root, "alpha");
    create_stale_clone(&repos_root, "beta");
    let config = write_config(
        temp_dir.path(),
        &[unreachable_url("alpha"), unreachable_url("beta")],
    );
    let out = temp_dir.path().join("out");

    repo_sbom(temp_dir.path(), FakeTool::Succeed)
        .arg(&config)
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Pull failed"))
        .stdout(predicate::str::contains("generated alpha"))
        .stdout(predicate::str::contains("2 succeeded, 0 failed"))
        .stdout(predicate::str::contains("Generated 2 SBOMs:"))
        .stdout(predicate::str::contains(
            out.join("beta.sbom.json").display().to_string(),
        ));

    assert!(out.join("alpha.sbom.json").is_file());
    assert!(out.join("beta.sbom.json").is_file());
    assert!(scratch_dirs(&out).is_empty());
}

#[test]
fn test_partial_failure_names_the_url() {
    let temp_dir = TempDir::new().unwrap();
    create_stale_clone(&temp_dir.path().join("repos"), "present");
    let missing = unreachable_url("missing");
    let config = write_config(temp_dir.path(), &[missing.clone(), unreachable_url("present")]);
    let out = temp_dir.path().join("out");

    repo_sbom(temp_dir.path(), FakeTool::Succeed)
        .arg(&config)
        .arg(&out)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(format!("Failed to process {}", missing)))
        .stdout(predicate::str::contains("1 succeeded, 1 failed"));

    assert!(out.join("present.sbom.json").is_file());
    assert!(!out.join("missing.sbom.json").exists());
}

#[test]
fn test_generator_timeout() {
    let temp_dir = TempDir::new().unwrap();
    create_stale_clone(&temp_dir.path().join("repos"), "tool");
    let config = write_config(temp_dir.path(), &[unreachable_url("tool")]);

    repo_sbom(temp_dir.path(), FakeTool::Hang)
        .arg("--timeout-secs")
        .arg("1")
        .arg(&config)
        .arg(temp_dir.path().join("out"))
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("timed out after 1 seconds"))
        .stdout(predicate::str::contains("scanning sources"));
}

#[test]
fn test_missing_artifact_leaves_scratch() {
    let temp_dir = TempDir::new().unwrap();
    create_stale_clone(&temp_dir.path().join("repos"), "tool");
    let config = write_config(temp_dir.path(), &[unreachable_url("tool")]);
    let out = temp_dir.path().join("out");

    repo_sbom(temp_dir.path(), FakeTool::NoArtifact)
        .arg(&config)
        .arg(&out)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("nothing to do"));

    assert_eq!(scratch_dirs(&out), vec!["_manifest_tool".to_string()]);
}
