//! Integration tests for `courseup cache`

mod common;

use common::TestWorkspace;

#[test]
fn test_cache_prints_directory() {
    let workspace = TestWorkspace::new();
    let output = workspace.run(&["cache"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Cache directory"));
    assert!(stdout.contains("cache"));
}

#[test]
fn test_cache_clean_removes_directory() {
    let workspace = TestWorkspace::new();
    workspace.create_file("cache/deadbeef", "stale content");
    workspace.create_file("cache/deadbeef.meta.json", "{}");

    let output = workspace.run(&["cache", "--clean"]);

    assert!(output.status.success());
    assert!(!workspace.file_exists("cache/deadbeef"));
    assert!(!workspace.file_exists("cache"));
}

#[test]
fn test_cache_clean_is_idempotent() {
    let workspace = TestWorkspace::new();

    let first = workspace.run(&["cache", "--clean"]);
    let second = workspace.run(&["cache", "--clean"]);

    assert!(first.status.success());
    assert!(second.status.success());
}
