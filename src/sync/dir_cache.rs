//! Remote directory bookkeeping
//!
//! Tracks which remote directories have been ensured this run so each one
//! costs at most one remote command. A directory that fails to ensure
//! poisons its whole subtree: every later task destined under it fails with
//! the shared cause and no push is attempted.

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

use super::transport::{shell_quote, Transport};

/// Why a directory could not be ensured
#[derive(Error, Debug)]
pub enum EnsureError {
    /// The mkdir command itself failed just now
    #[error("cannot create remote directory {dir}: {diagnostic}")]
    MkdirFailed { dir: String, diagnostic: String },

    /// An earlier ensure of this directory (or an ancestor) already failed
    #[error("blocked: remote directory {failed_dir} could not be created earlier: {diagnostic}")]
    SubtreeBlocked {
        failed_dir: String,
        diagnostic: String,
    },
}

/// Per-run cache of ensured remote directories.
///
/// Discarded at run end; nothing persists between runs.
#[derive(Debug, Default)]
pub struct RemoteDirCache {
    /// Exact paths confirmed to exist this run
    ensured: HashSet<String>,
    /// Paths whose mkdir failed, with the diagnostic of the first failure
    failed: BTreeMap<String, String>,
}

impl RemoteDirCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure `dir` exists on the remote host.
    ///
    /// No-op when `dir` was already ensured this run. `mkdir -p` is
    /// idempotent on the remote side, so a directory that already exists
    /// succeeds. Only the exact path is memoized; ancestors created
    /// implicitly by -p still get their own command if asked for later.
    pub fn ensure(&mut self, transport: &dyn Transport, dir: &str) -> Result<(), EnsureError> {
        if self.ensured.contains(dir) {
            return Ok(());
        }

        if let Some((failed_dir, diagnostic)) = self.blocking_failure(dir) {
            return Err(EnsureError::SubtreeBlocked {
                failed_dir: failed_dir.to_string(),
                diagnostic: diagnostic.to_string(),
            });
        }

        match transport.run(&format!("mkdir -p {}", shell_quote(dir))) {
            Ok(_) => {
                self.ensured.insert(dir.to_string());
                Ok(())
            }
            Err(e) => {
                let diagnostic = e.to_string();
                self.failed.insert(dir.to_string(), diagnostic.clone());
                Err(EnsureError::MkdirFailed {
                    dir: dir.to_string(),
                    diagnostic,
                })
            }
        }
    }

    /// The recorded failure covering `dir`, if any: either `dir` itself or
    /// an ancestor of it failed earlier this run.
    fn blocking_failure(&self, dir: &str) -> Option<(&str, &str)> {
        self.failed
            .iter()
            .find(|(failed, _)| {
                dir == failed.as_str()
                    || dir
                        .strip_prefix(failed.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            })
            .map(|(failed, diag)| (failed.as_str(), diag.as_str()))
    }
}
