//! Integration tests for the courseup CLI surface
//!
//! These run the compiled binary and only exercise paths that work
//! offline: help text, argument validation, and local failure modes.

mod common;

use common::TestWorkspace;

#[test]
fn test_help_lists_commands() {
    let workspace = TestWorkspace::new();
    let output = workspace.run(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("setup"));
    assert!(stdout.contains("release"));
    assert!(stdout.contains("cache"));
}

#[test]
fn test_no_subcommand_prints_help() {
    let workspace = TestWorkspace::new();
    let output = workspace.run(&[]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"));
}

#[test]
fn test_version_flag() {
    let workspace = TestWorkspace::new();
    let output = workspace.run(&["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_setup_rejects_missing_base_dir() {
    let workspace = TestWorkspace::new();
    // COURSEUP_DIR points at a directory that was never created
    let output = workspace.run(&["setup"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("does not exist"),
        "Expected a missing-base error, got: {stderr}"
    );
}

#[test]
fn test_setup_help_documents_clone_modes() {
    let workspace = TestWorkspace::new();
    let output = workspace.run(&["setup", "--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--clone"));
    assert!(stdout.contains("--deep-clone"));
    assert!(stdout.contains("--force"));
}

#[test]
fn test_release_rejects_invalid_label_pattern() {
    let workspace = TestWorkspace::new();
    // An unclosed group never reaches the network
    let output = workspace.run(&["release", "--label", "("]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("label"),
        "Expected an invalid-pattern error, got: {stderr}"
    );
}
