//! Transport port - abstraction over the two remote primitives
//!
//! The engine only ever needs "push a local file to a remote path" and "run
//! a command on the remote host". Both are blocking, single-shot, and report
//! failure as a value - never as a process-fatal condition. Retry policy, if
//! any, belongs to the caller.

use std::path::Path;

use thiserror::Error;

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Transport operation errors
#[derive(Error, Debug)]
pub enum TransportError {
    /// The underlying program could not be started at all
    #[error("cannot spawn {program}: {source}")]
    Spawn {
        program: &'static str,
        source: std::io::Error,
    },

    /// The program ran and reported failure; diagnostic carries its stderr
    #[error("{program} failed: {diagnostic}")]
    CommandFailed {
        program: &'static str,
        diagnostic: String,
    },
}

/// Abstract remote transport
///
/// Implementations:
/// - `SshTransport` - scp for pushes, ssh for remote commands
/// - `MockTransport` - in-memory remote for tests
pub trait Transport {
    /// Copy one local file's bytes to `remote_path`, overwriting any
    /// existing file there.
    fn push(&self, local: &Path, remote_path: &str) -> TransportResult<()>;

    /// Run a command on the remote host and return its captured stdout.
    fn run(&self, command: &str) -> TransportResult<String>;
}

/// Quote a remote path for safe use inside a shell command
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

/// Mock transport for testing
///
/// Records every push and remote command into shared maps so tests can
/// assert on the resulting "remote" state. Uses `Arc<Mutex<>>` internally so
/// it can be cloned and shared, same as the engine sees it.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: std::sync::Arc<std::sync::Mutex<MockRemote>>,
}

#[cfg(test)]
#[derive(Default)]
struct MockRemote {
    /// remote path -> pushed bytes
    files: std::collections::HashMap<String, Vec<u8>>,
    /// every command passed to run(), in order
    commands: Vec<String>,
    /// remote paths whose push should fail
    fail_push: std::collections::HashSet<String>,
    /// substrings of commands that should fail
    fail_run: Vec<String>,
}

#[cfg(test)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make pushes to `remote_path` fail with a canned diagnostic
    pub fn fail_push_on(&self, remote_path: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_push.insert(remote_path.to_string());
    }

    /// Make any command containing `fragment` fail
    pub fn fail_run_containing(&self, fragment: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_run.push(fragment.to_string());
    }

    /// Bytes pushed to `remote_path`, if any
    pub fn pushed(&self, remote_path: &str) -> Option<Vec<u8>> {
        let inner = self.inner.lock().unwrap();
        inner.files.get(remote_path).cloned()
    }

    pub fn pushed_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.files.len()
    }

    /// All commands received, in order
    pub fn commands(&self) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        inner.commands.clone()
    }
}

#[cfg(test)]
impl Transport for MockTransport {
    fn push(&self, local: &Path, remote_path: &str) -> TransportResult<()> {
        let data = std::fs::read(local).map_err(|e| TransportError::Spawn {
            program: "scp",
            source: e,
        })?;

        let mut inner = self.inner.lock().unwrap();
        if inner.fail_push.contains(remote_path) {
            return Err(TransportError::CommandFailed {
                program: "scp",
                diagnostic: format!("simulated push failure for {remote_path}"),
            });
        }
        inner.files.insert(remote_path.to_string(), data);
        Ok(())
    }

    fn run(&self, command: &str) -> TransportResult<String> {
        let mut inner = self.inner.lock().unwrap();
        inner.commands.push(command.to_string());
        if inner.fail_run.iter().any(|f| command.contains(f.as_str())) {
            return Err(TransportError::CommandFailed {
                program: "ssh",
                diagnostic: format!("simulated command failure: {command}"),
            });
        }
        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_quote_simple() {
        assert_eq!(shell_quote("/opt/project/a.go"), "'/opt/project/a.go'");
    }

    #[test]
    fn shell_quote_with_space() {
        assert_eq!(shell_quote("/opt/my file"), "'/opt/my file'");
    }

    #[test]
    fn shell_quote_with_single_quote() {
        assert_eq!(shell_quote("/opt/it's"), "'/opt/it'\\''s'");
    }

    #[test]
    fn mock_records_pushes() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("a.txt");
        std::fs::write(&local, b"bytes").unwrap();

        let transport = MockTransport::new();
        transport.push(&local, "/r/a.txt").unwrap();

        assert_eq!(transport.pushed("/r/a.txt"), Some(b"bytes".to_vec()));
    }

    #[test]
    fn mock_simulates_push_failure() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("a.txt");
        std::fs::write(&local, b"bytes").unwrap();

        let transport = MockTransport::new();
        transport.fail_push_on("/r/a.txt");

        let err = transport.push(&local, "/r/a.txt").unwrap_err();
        assert!(matches!(err, TransportError::CommandFailed { .. }));
        assert!(transport.pushed("/r/a.txt").is_none());
    }

    #[test]
    fn mock_simulates_command_failure() {
        let transport = MockTransport::new();
        transport.fail_run_containing("/r/bad");

        assert!(transport.run("mkdir -p '/r/ok'").is_ok());
        assert!(transport.run("mkdir -p '/r/bad'").is_err());
        assert_eq!(transport.commands().len(), 2);
    }
}
