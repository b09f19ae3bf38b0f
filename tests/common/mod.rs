//! Common test utilities for Treeship CLI tests.
//!
//! Provides `TestEnv` - an isolated project directory with a config file,
//! plus helpers to run the treeship binary and capture its output.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Result of running a treeship CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated test environment with a temp project directory
pub struct TestEnv {
    pub project_root: TempDir,
    treeship_bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            project_root: TempDir::new().expect("create temp project"),
            treeship_bin: PathBuf::from(env!("CARGO_BIN_EXE_treeship")),
        }
    }

    pub fn root(&self) -> &Path {
        self.project_root.path()
    }

    /// Write a file under the project root, creating parents
    pub fn write_file(&self, relative: &str, bytes: &[u8]) -> &Self {
        let path = self.root().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).expect("create parent dirs");
        std::fs::write(path, bytes).expect("write fixture");
        self
    }

    /// Write treeship.toml under the project root
    pub fn write_config(&self, toml: &str) -> &Self {
        self.write_file("treeship.toml", toml.as_bytes())
    }

    /// Run treeship from the project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        let output = Command::new(&self.treeship_bin)
            .current_dir(self.root())
            .args(args)
            .output()
            .expect("failed to execute treeship");

        Self::output_to_result(output)
    }

    fn output_to_result(output: Output) -> TestResult {
        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
