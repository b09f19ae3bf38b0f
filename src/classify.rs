//! File classification policy
//!
//! Decides, from a file name alone, whether a file gets its line endings
//! normalized before transfer or is copied byte-for-byte. The decision never
//! looks at content - an unknown extension is a raw copy, not a guess.

/// How a file's content is prepared for transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClass {
    /// Collapse CRLF to LF through a staged copy before pushing
    Normalize,
    /// Push the source bytes untouched
    Raw,
}

/// Classify a file by its extension against the allow-list.
///
/// The allow-list holds bare extensions without the leading dot ("go",
/// "sh", ...). Matching is exact and case-sensitive; files with no
/// extension are always `Raw`.
pub fn classify(file_name: &str, allowlist: &[String]) -> FileClass {
    let ext = match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext,
        _ => return FileClass::Raw,
    };

    if allowlist.iter().any(|a| a == ext) {
        FileClass::Normalize
    } else {
        FileClass::Raw
    }
}
