//! Treeship - mirror a local project tree onto a remote host
//!
//! Treeship walks configured source roots, normalizes line endings for
//! allow-listed text files through a scoped staging copy, ensures remote
//! directories once per run, and pushes each file over an scp/ssh transport.
//! Failures are isolated per file so one bad transfer never aborts a run.

pub mod classify;
pub mod config;
pub mod error;
pub mod normalize;
pub mod sync;
pub mod walk;

// Re-exports for convenience
pub use classify::{classify, FileClass};
pub use config::{Config, MirrorConfig};
pub use error::{TreeshipError, TreeshipResult};
pub use normalize::{normalize_crlf, stage_normalized, StagedFile};
pub use sync::{
    RunSummary, SshTransport, SyncEngine, SyncEngineOptions, SyncEvent, SyncTask, TransferOutcome,
    TransferResult, Transport, TransportError,
};
pub use walk::{walk_root, WalkedFile};
