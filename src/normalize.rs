//! Line-ending normalization through a scoped staging copy
//!
//! Text files are never rewritten in place. The transformed bytes go into a
//! `NamedTempFile`; the transport reads from there, and the temp file is
//! deleted when the `StagedFile` guard drops - on success and on every
//! failure path alike.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{TreeshipError, TreeshipResult};

/// Collapse every CRLF pair to a single LF.
///
/// Lone `\r` bytes are left alone; only the two-byte `\r\n` sequence is
/// rewritten. Binary-safe: operates on bytes, not on UTF-8.
pub fn normalize_crlf(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        if input[i] == b'\r' && input.get(i + 1) == Some(&b'\n') {
            out.push(b'\n');
            i += 2;
        } else {
            out.push(input[i]);
            i += 1;
        }
    }
    out
}

/// A normalized copy of a source file, staged in the system temp directory.
///
/// Owns the underlying temp file; dropping the guard removes the artifact.
#[derive(Debug)]
pub struct StagedFile {
    file: NamedTempFile,
}

impl StagedFile {
    /// Path of the staged copy, for handing to the transport
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Read `source`, normalize its line endings, and stage the result.
///
/// A read failure is fatal for this file only; the caller records it and
/// moves on to the next task.
pub fn stage_normalized(source: &Path) -> TreeshipResult<StagedFile> {
    let data = std::fs::read(source).map_err(|e| TreeshipError::SourceRead {
        path: source.to_path_buf(),
        source: e,
    })?;

    let mut file = tempfile::Builder::new()
        .prefix("treeship-")
        .suffix(".lf")
        .tempfile()
        .map_err(|e| TreeshipError::Staging {
            path: source.to_path_buf(),
            source: e,
        })?;

    file.write_all(&normalize_crlf(&data))
        .and_then(|_| file.flush())
        .map_err(|e| TreeshipError::Staging {
            path: source.to_path_buf(),
            source: e,
        })?;

    Ok(StagedFile { file })
}
