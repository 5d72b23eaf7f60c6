//! Common test utilities for questlog integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't touch the
//! user's real goal file or config.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
pub use tempfile::TempDir;

/// A test environment with isolated data and config directories.
///
/// The `ql()` method returns a `Command` that sets `QL_DATA_DIR` and
/// `QL_CONFIG_DIR` per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
    pub config_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with isolated directories.
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
            config_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the ql binary with isolated directories.
    pub fn ql(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_ql"));
        cmd.current_dir(self.data_dir.path());
        cmd.env("QL_DATA_DIR", self.data_dir.path());
        cmd.env("QL_CONFIG_DIR", self.config_dir.path());
        cmd.env_remove("QL_FILE");
        cmd.env_remove("QL_LOG");
        cmd
    }

    /// Run `ql` with the given arguments, assert success and parse the JSON output.
    pub fn ql_json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.ql().args(args).output().unwrap();
        assert!(
            output.status.success(),
            "ql {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }

    /// Write config.kdl into the isolated config directory.
    pub fn write_config(&self, kdl: &str) {
        std::fs::write(self.config_dir.path().join("config.kdl"), kdl).unwrap();
    }

    /// Get the path to the data directory.
    pub fn data_path(&self) -> &Path {
        self.data_dir.path()
    }

    /// Get the default goal file path.
    pub fn data_file(&self) -> PathBuf {
        self.data_dir.path().join("goals.txt")
    }

    /// Get the default action log path.
    pub fn action_log(&self) -> PathBuf {
        self.data_dir.path().join("action.log")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
