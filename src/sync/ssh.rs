//! SSH transport
//!
//! Shells out to `scp` for pushes and `ssh` for remote commands, with an
//! optional identity file. Host key checking is disabled because the target
//! is a box the user already controls; the transport captures stderr and
//! returns it as the diagnostic instead of inheriting the terminal.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::transport::{Transport, TransportError, TransportResult};

/// Transport backed by the OpenSSH client utilities
pub struct SshTransport {
    /// SSH destination (user@host or host)
    host: String,
    /// Private key passed via -i, when configured
    identity_file: Option<PathBuf>,
}

impl SshTransport {
    pub fn new(host: impl Into<String>, identity_file: Option<PathBuf>) -> Self {
        Self {
            host: host.into(),
            identity_file,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Common scp/ssh invocation prefix
    fn command(&self, program: &'static str) -> Command {
        let mut cmd = Command::new(program);
        if let Some(key) = &self.identity_file {
            cmd.arg("-i").arg(key);
        }
        cmd.arg("-o").arg("StrictHostKeyChecking=no");
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    fn run_captured(mut cmd: Command, program: &'static str) -> TransportResult<String> {
        let output = cmd
            .output()
            .map_err(|e| TransportError::Spawn { program, source: e })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TransportError::CommandFailed {
                program,
                diagnostic: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Transport for SshTransport {
    fn push(&self, local: &Path, remote_path: &str) -> TransportResult<()> {
        let mut cmd = self.command("scp");
        cmd.arg(local).arg(format!("{}:{}", self.host, remote_path));
        Self::run_captured(cmd, "scp").map(|_| ())
    }

    fn run(&self, command: &str) -> TransportResult<String> {
        let mut cmd = self.command("ssh");
        cmd.arg(&self.host).arg(command);
        Self::run_captured(cmd, "ssh")
    }
}
