//! Mirror engine - drives walk, classify, normalize, ensure, push
//!
//! Per-file lifecycle: Pending -> Classified -> {Normalized | RawReady} ->
//! Transferred | Failed. Terminal states only; a failed file never blocks
//! the files after it, except that a failed directory-ensure blocks the
//! whole subtree under it for the rest of the run.
//!
//! ## Usage
//!
//! ```ignore
//! let transport = SshTransport::new(&config.host, config.identity_file.clone());
//! let mut engine = SyncEngine::new(&config, &transport, SyncEngineOptions::default());
//! let summary = engine.run();
//! println!("{} transferred, {} failed", summary.transferred_count(), summary.failed_count());
//! ```

use std::path::Path;

use crate::classify::{classify, FileClass};
use crate::config::MirrorConfig;
use crate::normalize::stage_normalized;
use crate::walk::walk_root;

use super::dir_cache::RemoteDirCache;
use super::transport::Transport;
use super::{remote_join, remote_parent, RunSummary, SyncEvent, SyncTask, TransferOutcome, TransferResult};

/// Options for the mirror engine
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncEngineOptions {
    /// Plan tasks but make no transport call and stage nothing
    pub dry_run: bool,
}

/// Sequential mirror engine.
///
/// Generic over `T: Transport` so tests can drive it against an in-memory
/// remote. Holds the per-run directory cache; construct a fresh engine per
/// run.
pub struct SyncEngine<'a, T: Transport> {
    config: &'a MirrorConfig,
    transport: &'a T,
    options: SyncEngineOptions,
    dir_cache: RemoteDirCache,
}

impl<'a, T: Transport> SyncEngine<'a, T> {
    pub fn new(config: &'a MirrorConfig, transport: &'a T, options: SyncEngineOptions) -> Self {
        Self {
            config,
            transport,
            options,
            dir_cache: RemoteDirCache::new(),
        }
    }

    /// Mirror everything the config names, recording one result per file.
    pub fn run(&mut self) -> RunSummary {
        self.run_with_callback::<fn(SyncEvent)>(None)
    }

    /// Mirror with a progress callback for per-file log lines.
    pub fn run_with_callback<F>(&mut self, mut callback: Option<F>) -> RunSummary
    where
        F: FnMut(SyncEvent),
    {
        let mut summary = RunSummary::default();
        let config = self.config;

        for root in &config.roots {
            let local_root = config.source_root.join(root);
            if !local_root.is_dir() {
                emit(&mut callback, SyncEvent::RootSkipped { root: root.clone() });
                summary.skipped_roots.push(root.clone());
                continue;
            }

            // Ensure the remote root up front; a failure here is recorded in
            // the cache and every file below fails with the shared cause.
            if !self.options.dry_run {
                let remote_root = remote_join(&config.base_dir, root);
                let _ = self.dir_cache.ensure(self.transport, &remote_root);
            }

            for walked in walk_root(&local_root, &config.source_root) {
                match walked {
                    Ok(file) => {
                        let task = self.make_task(&file.path, &file.rel);
                        let result = self.process_task(&task, &mut callback, summary.results.len());
                        summary.results.push(result);
                    }
                    Err(e) => {
                        // The entry never became a task; record the walk
                        // failure against the root so it shows in the summary.
                        let result = TransferResult {
                            source: local_root.clone(),
                            remote_path: remote_join(&config.base_dir, root),
                            outcome: TransferOutcome::Failed,
                            diagnostic: Some(e.to_string()),
                        };
                        emit(
                            &mut callback,
                            SyncEvent::ItemError {
                                index: summary.results.len(),
                                path: result.source.display().to_string(),
                                message: e.to_string(),
                            },
                        );
                        summary.results.push(result);
                    }
                }
            }
        }

        for file in &config.files {
            let local = config.source_root.join(file);
            if !local.is_file() {
                emit(&mut callback, SyncEvent::FileSkipped { path: file.clone() });
                summary.skipped_files.push(file.clone());
                continue;
            }
            let task = self.make_task(&local, file);
            let result = self.process_task(&task, &mut callback, summary.results.len());
            summary.results.push(result);
        }

        summary
    }

    fn make_task(&self, source: &Path, rel: &Path) -> SyncTask {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        SyncTask {
            source: source.to_path_buf(),
            dest_rel: rel.to_path_buf(),
            class: classify(&name, &self.config.normalize_extensions),
        }
    }

    /// Push one task, isolating its failure to this result.
    fn process_task<F>(
        &mut self,
        task: &SyncTask,
        callback: &mut Option<F>,
        index: usize,
    ) -> TransferResult
    where
        F: FnMut(SyncEvent),
    {
        let remote_path = remote_join(&self.config.base_dir, &task.dest_rel);
        let display_path = task.dest_rel.display().to_string();

        emit(
            callback,
            SyncEvent::ItemStart {
                index,
                path: display_path.clone(),
            },
        );

        if self.options.dry_run {
            emit(
                callback,
                SyncEvent::ItemTransferred {
                    index,
                    path: display_path,
                },
            );
            return TransferResult {
                source: task.source.clone(),
                remote_path,
                outcome: TransferOutcome::Transferred,
                diagnostic: None,
            };
        }

        let outcome = self.transfer(task, &remote_path);

        match outcome {
            Ok(()) => {
                emit(
                    callback,
                    SyncEvent::ItemTransferred {
                        index,
                        path: display_path,
                    },
                );
                TransferResult {
                    source: task.source.clone(),
                    remote_path,
                    outcome: TransferOutcome::Transferred,
                    diagnostic: None,
                }
            }
            Err(message) => {
                emit(
                    callback,
                    SyncEvent::ItemError {
                        index,
                        path: display_path,
                        message: message.clone(),
                    },
                );
                TransferResult {
                    source: task.source.clone(),
                    remote_path,
                    outcome: TransferOutcome::Failed,
                    diagnostic: Some(message),
                }
            }
        }
    }

    /// Ensure the parent directory, stage if needed, push. The staging guard
    /// drops on every path out of here, deleting the artifact whether the
    /// push succeeded or not.
    fn transfer(&mut self, task: &SyncTask, remote_path: &str) -> Result<(), String> {
        if let Some(parent) = remote_parent(remote_path) {
            self.dir_cache
                .ensure(self.transport, parent)
                .map_err(|e| e.to_string())?;
        }

        let staged = match task.class {
            FileClass::Normalize => Some(stage_normalized(&task.source).map_err(|e| e.to_string())?),
            FileClass::Raw => None,
        };

        let local = staged
            .as_ref()
            .map(|s| s.path())
            .unwrap_or(task.source.as_path());

        self.transport
            .push(local, remote_path)
            .map_err(|e| e.to_string())
    }
}

fn emit<F: FnMut(SyncEvent)>(callback: &mut Option<F>, event: SyncEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}
