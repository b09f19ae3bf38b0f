//! Recursive directory walking
//!
//! Enumerates every regular file under a root and pairs it with its path
//! relative to the sync root, which later becomes the remote destination.
//! Each run re-walks from scratch; there is no manifest of prior runs.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::{TreeshipError, TreeshipResult};

/// One file found under a sync root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
    /// Absolute (or root-joined) path on the local filesystem
    pub path: PathBuf,
    /// Path relative to the sync root, preserved in the remote tree
    pub rel: PathBuf,
}

/// Lazily walk `root`, yielding every regular file below it.
///
/// `sync_root` must be `root` or an ancestor of it; relative paths are
/// computed against it. Traversal is sorted by file name so the order is
/// stable within a run. Symlinks are not followed.
pub fn walk_root<'a>(
    root: &Path,
    sync_root: &'a Path,
) -> impl Iterator<Item = TreeshipResult<WalkedFile>> + 'a {
    let root = root.to_path_buf();

    WalkBuilder::new(&root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build()
        .filter_map(move |entry| match entry {
            Ok(entry) => {
                if !entry.file_type().is_some_and(|t| t.is_file()) {
                    return None;
                }
                let path = entry.into_path();
                match path.strip_prefix(sync_root) {
                    Ok(rel) => Some(Ok(WalkedFile {
                        rel: rel.to_path_buf(),
                        path,
                    })),
                    Err(_) => Some(Err(TreeshipError::Walk {
                        root: root.clone(),
                        message: format!(
                            "{} is outside sync root {}",
                            path.display(),
                            sync_root.display()
                        ),
                    })),
                }
            }
            Err(e) => Some(Err(TreeshipError::Walk {
                root: root.clone(),
                message: e.to_string(),
            })),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"x").unwrap();
    }

    fn collect(root: &Path, sync_root: &Path) -> Vec<WalkedFile> {
        walk_root(root, sync_root)
            .collect::<TreeshipResult<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn finds_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.go"));
        touch(&dir.path().join("nested/b.sh"));
        touch(&dir.path().join("nested/deeper/c.txt"));

        let files = collect(dir.path(), dir.path());
        let rels: Vec<_> = files.iter().map(|f| f.rel.clone()).collect();

        assert_eq!(files.len(), 3);
        assert!(rels.contains(&PathBuf::from("a.go")));
        assert!(rels.contains(&PathBuf::from("nested/b.sh")));
        assert!(rels.contains(&PathBuf::from("nested/deeper/c.txt")));
    }

    #[test]
    fn skips_directories_themselves() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("sub/only.txt"));

        let files = collect(dir.path(), dir.path());
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].rel, PathBuf::from("sub/only.txt"));
    }

    #[test]
    fn rel_is_computed_against_sync_root_not_walked_root() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("internal/server/conn.go"));

        let files = collect(&dir.path().join("internal"), dir.path());
        assert_eq!(files[0].rel, PathBuf::from("internal/server/conn.go"));
    }

    #[test]
    fn includes_hidden_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join(".env.example"));

        let files = collect(dir.path(), dir.path());
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn order_is_stable_across_walks() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.txt"));
        touch(&dir.path().join("a.txt"));
        touch(&dir.path().join("sub/c.txt"));

        let first = collect(dir.path(), dir.path());
        let second = collect(dir.path(), dir.path());
        assert_eq!(first, second);
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect(dir.path(), dir.path()).is_empty());
    }
}
