//! Configuration module for Treeship
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Project config (treeship.toml in the source root)
//! 3. Built-in defaults (lowest priority)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{TreeshipError, TreeshipResult};

/// Extensions the original workflow normalized; used when the config file
/// does not override `sync.normalize_extensions`.
const DEFAULT_NORMALIZE_EXTENSIONS: &[&str] =
    &["go", "sh", "md", "mod", "json", "yml", "yaml", "cmd", "txt"];

/// Remote destination configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RemoteConfig {
    /// SSH destination, e.g. "deploy@10.0.0.93"
    #[serde(default)]
    pub host: Option<String>,

    /// Directory on the remote host the mirrored tree is rooted under
    #[serde(default)]
    pub base_dir: Option<String>,

    /// Private key passed to ssh/scp via -i. Opaque to the engine.
    #[serde(default)]
    pub identity_file: Option<PathBuf>,
}

/// What to mirror and how to treat it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Directories to mirror, relative to the source root
    #[serde(default)]
    pub roots: Vec<PathBuf>,

    /// Individual files to mirror, relative to the source root
    #[serde(default)]
    pub files: Vec<PathBuf>,

    /// Extensions (without dot) whose files get CRLF -> LF normalization
    #[serde(default = "default_normalize_extensions")]
    pub normalize_extensions: Vec<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            files: Vec::new(),
            normalize_extensions: default_normalize_extensions(),
        }
    }
}

fn default_normalize_extensions() -> Vec<String> {
    DEFAULT_NORMALIZE_EXTENSIONS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// On-disk configuration (treeship.toml)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub sync: SyncConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// A missing file yields the defaults; a present-but-invalid file is an
    /// error, so a typo never silently degrades into a default run.
    pub fn load(path: &Path) -> TreeshipResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| TreeshipError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| TreeshipError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Fully resolved, immutable configuration for one mirror run.
///
/// Built from `Config` plus CLI overrides; the engine only ever sees this.
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// SSH destination (user@host or host)
    pub host: String,
    /// Remote directory the tree is rooted under
    pub base_dir: String,
    /// Optional private key for ssh/scp -i
    pub identity_file: Option<PathBuf>,
    /// Local directory roots/files are resolved against
    pub source_root: PathBuf,
    /// Directories to mirror, relative to `source_root`
    pub roots: Vec<PathBuf>,
    /// Individual files to mirror, relative to `source_root`
    pub files: Vec<PathBuf>,
    /// Extension allow-list for normalization
    pub normalize_extensions: Vec<String>,
}

impl MirrorConfig {
    /// Resolve file config + CLI overrides into a run configuration.
    ///
    /// `remote_override` takes "host:/base/dir" and wins over the
    /// `[remote]` section wholesale for host and base_dir.
    pub fn resolve(
        config: Config,
        source_root: PathBuf,
        remote_override: Option<&str>,
        identity_override: Option<PathBuf>,
    ) -> TreeshipResult<Self> {
        let (host, base_dir) = match remote_override {
            Some(spec) => {
                let (h, p) = spec
                    .split_once(':')
                    .filter(|(h, p)| !h.is_empty() && !p.is_empty())
                    .ok_or_else(|| TreeshipError::InvalidRemote {
                        spec: spec.to_string(),
                    })?;
                (h.to_string(), p.to_string())
            }
            None => {
                let host = config
                    .remote
                    .host
                    .clone()
                    .ok_or_else(|| TreeshipError::ConfigMissing {
                        key: "remote.host".to_string(),
                        flag: "--remote".to_string(),
                    })?;
                let base_dir =
                    config
                        .remote
                        .base_dir
                        .clone()
                        .ok_or_else(|| TreeshipError::ConfigMissing {
                            key: "remote.base_dir".to_string(),
                            flag: "--remote".to_string(),
                        })?;
                (host, base_dir)
            }
        };

        if !source_root.is_dir() {
            return Err(TreeshipError::SourceNotFound { path: source_root });
        }

        let identity_file = identity_override
            .or(config.remote.identity_file)
            .map(|p| expand_home(&p));

        Ok(Self {
            host,
            base_dir,
            identity_file,
            source_root,
            roots: config.sync.roots,
            files: config.sync.files,
            normalize_extensions: config.sync.normalize_extensions,
        })
    }
}

/// Expand a leading ~/ to the local home directory
pub fn expand_home(path: &Path) -> PathBuf {
    let p = path.to_string_lossy();
    if let Some(rest) = p.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if p == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("treeship.toml")).unwrap();

        assert!(config.remote.host.is_none());
        assert!(config.sync.roots.is_empty());
        assert!(config
            .sync
            .normalize_extensions
            .contains(&"go".to_string()));
    }

    #[test]
    fn load_parses_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("treeship.toml");
        std::fs::write(
            &path,
            r#"
[remote]
host = "deploy@10.0.0.93"
base_dir = "/opt/project"
identity_file = "~/.ssh/deploy_key"

[sync]
roots = ["cmd/app", "internal"]
files = ["go.mod"]
normalize_extensions = ["go", "sh"]
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.remote.host.as_deref(), Some("deploy@10.0.0.93"));
        assert_eq!(config.remote.base_dir.as_deref(), Some("/opt/project"));
        assert_eq!(config.sync.roots.len(), 2);
        assert_eq!(config.sync.files, vec![PathBuf::from("go.mod")]);
        assert_eq!(config.sync.normalize_extensions, vec!["go", "sh"]);
    }

    #[test]
    fn load_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("treeship.toml");
        std::fs::write(&path, "[remote\nhost=").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, TreeshipError::ConfigParse { .. }));
    }

    #[test]
    fn resolve_requires_host() {
        let dir = tempfile::tempdir().unwrap();
        let err = MirrorConfig::resolve(Config::default(), dir.path().to_path_buf(), None, None)
            .unwrap_err();
        assert!(matches!(err, TreeshipError::ConfigMissing { .. }));
    }

    #[test]
    fn resolve_remote_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.remote.host = Some("other@host".to_string());
        config.remote.base_dir = Some("/elsewhere".to_string());

        let resolved = MirrorConfig::resolve(
            config,
            dir.path().to_path_buf(),
            Some("deploy@box:/opt/project"),
            None,
        )
        .unwrap();

        assert_eq!(resolved.host, "deploy@box");
        assert_eq!(resolved.base_dir, "/opt/project");
    }

    #[test]
    fn resolve_rejects_bare_host_override() {
        let dir = tempfile::tempdir().unwrap();
        let err = MirrorConfig::resolve(
            Config::default(),
            dir.path().to_path_buf(),
            Some("hostonly"),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, TreeshipError::InvalidRemote { .. }));
    }

    #[test]
    fn resolve_rejects_missing_source_root() {
        let err = MirrorConfig::resolve(
            Config::default(),
            PathBuf::from("/definitely/not/here"),
            Some("h:/base"),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, TreeshipError::SourceNotFound { .. }));
    }

    #[test]
    fn expand_home_leaves_plain_paths() {
        let path = PathBuf::from("/tmp/key");
        assert_eq!(expand_home(&path), path);
    }

    #[test]
    fn expand_home_expands_tilde_prefix() {
        let expanded = expand_home(Path::new("~/.ssh/key"));
        assert!(!expanded.to_string_lossy().contains('~'));
    }
}
