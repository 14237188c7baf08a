//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Test workspace context
///
/// Creates a temporary directory for test runs and provides
/// utilities for setting up test scenarios.
pub struct TestWorkspace {
    /// Temporary directory for the test run
    pub dir: TempDir,
}

impl TestWorkspace {
    /// Create a new test workspace in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test workspace directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test workspace
    #[allow(dead_code)]
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory in the test workspace
    #[allow(dead_code)]
    pub fn create_dir(&self, name: &str) {
        let path = self.dir.path().join(name);
        std::fs::create_dir_all(path).expect("Failed to create directory");
    }

    /// Check if a file exists in the test workspace
    #[allow(dead_code)]
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Run the courseup binary with the given arguments
    ///
    /// The cache directory is redirected into the workspace so tests
    /// never touch the real user cache.
    pub fn run(&self, args: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_courseup"));
        cmd.current_dir(self.dir.path());
        cmd.env("COURSEUP_CACHE_DIR", self.dir.path().join("cache"));
        cmd.env("COURSEUP_DIR", self.dir.path().join("base"));
        for arg in args {
            cmd.arg(arg);
        }
        cmd.output().expect("Failed to execute courseup")
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}
