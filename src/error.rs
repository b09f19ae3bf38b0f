//! Error types for Treeship
//!
//! Uses `thiserror` for library errors.

use std::path::PathBuf;
use thiserror::Error;

use crate::sync::transport::TransportError;

/// Result type alias for Treeship operations
pub type TreeshipResult<T> = Result<T, TreeshipError>;

/// Main error type for Treeship operations
#[derive(Error, Debug)]
pub enum TreeshipError {
    /// Configuration file could not be read
    #[error("cannot read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration file could not be parsed
    #[error("invalid config in {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Required configuration value missing
    #[error("missing config value '{key}' - set it in treeship.toml or pass {flag}")]
    ConfigMissing { key: String, flag: String },

    /// Remote spec could not be parsed
    #[error("invalid remote '{spec}' - expected host:/base/dir or user@host:/base/dir")]
    InvalidRemote { spec: String },

    /// Source root directory not found
    #[error("source directory not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// A file could not be read for staging
    #[error("cannot read {path}: {source}")]
    SourceRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The normalized copy could not be staged
    #[error("cannot stage normalized copy of {path}: {source}")]
    Staging {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Directory walk failed below a root
    #[error("cannot walk {root}: {message}")]
    Walk { root: PathBuf, message: String },

    /// Transport-level failure
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config_missing() {
        let err = TreeshipError::ConfigMissing {
            key: "remote.host".to_string(),
            flag: "--remote".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "missing config value 'remote.host' - set it in treeship.toml or pass --remote"
        );
    }

    #[test]
    fn test_error_display_source_read() {
        let err = TreeshipError::SourceRead {
            path: PathBuf::from("scripts/build.sh"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().starts_with("cannot read scripts/build.sh"));
    }
}
