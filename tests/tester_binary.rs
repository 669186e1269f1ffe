//! Integration tests for the `tester` binary
//!
//! The built binary is run as the sandbox runs it, with the report sent to
//! stdout so it can be read back alongside the fixed messages.

use serde_json::Value;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn tester(current_dir: &Path, args: &[&str], config: Option<&Path>) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_tester"));
    command
        .args(args)
        .current_dir(current_dir)
        .env_remove("SOURCEBOX_CONFIG")
        .env_remove("SOURCEBOX_IMAGE_FD")
        .env("SOURCEBOX_REPORT_SINK", "stdout");
    if let Some(config) = config {
        command.env("SOURCEBOX_CONFIG", config);
    }
    command.output().unwrap()
}

/// `<tmp>/project/tests.json`, so the project can be named relative to `<tmp>`
fn workspace(manifest: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("project");
    std::fs::create_dir(&project).unwrap();
    std::fs::write(project.join("tests.json"), manifest).unwrap();
    dir
}

#[test]
fn test_missing_project_path_prints_message_only() {
    let dir = tempfile::tempdir().unwrap();
    let output = tester(dir.path(), &[], None);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "No project path supplied for the tester\n"
    );
}

#[test]
fn test_relative_project_path_is_entered() {
    let dir = workspace(
        r#"{ "cases": [{ "name": "FileTests", "tests": [
            { "name": "test_marker", "command": ["cat", "marker.txt"], "expect_stdout": "here\n" }
        ] }] }"#,
    );
    std::fs::write(dir.path().join("project/marker.txt"), "here\n").unwrap();

    let output = tester(dir.path(), &["project"], None);
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["score"], 1.0);
    assert_eq!(report["max_score"], 1.0);
    assert_eq!(report["tests"][0]["output"], "here\n");
}

#[test]
fn test_unknown_project_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = tester(dir.path(), &["does-not-exist"], None);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_invalid_tests_prints_message_without_report() {
    let dir = workspace(r#"{ "cases": [] }"#);
    let output = tester(dir.path(), &["project"], None);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Invalid tests.\n");
}

#[test]
fn test_unbuffered_output_is_forwarded() {
    let dir = workspace(
        r#"{ "cases": [{ "name": "LoudTests", "tests": [
            { "name": "test_loud", "command": ["sh", "-c", "echo forwarded-line"] }
        ] }] }"#,
    );
    let config = dir.path().join("sourcebox.json");
    std::fs::write(&config, r#"{ "harness": { "buffer": false } }"#).unwrap();

    let output = tester(dir.path(), &["project"], Some(&config));
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let json = stdout.strip_prefix("forwarded-line\n").unwrap();
    let report: Value = serde_json::from_str(json).unwrap();
    assert_eq!(report["tests"][0]["success"], true);
    assert!(report["tests"][0].get("output").is_none());
}
