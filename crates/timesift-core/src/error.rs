//! Error types for inspection operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal errors that prevent an inspection from running at all.
///
/// These surface before any file-level work begins; when `inspect()` fails
/// with one of these, no partial results exist. Failures on individual paths
/// after traversal has begun are reported as [`PathError`]s instead and never
/// abort the scan.
#[derive(Debug, Error)]
pub enum InspectError {
    /// Permission denied for the root path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Root path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl InspectError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

impl From<crate::config::InspectConfigBuilderError> for InspectError {
    fn from(err: crate::config::InspectConfigBuilderError) -> Self {
        Self::InvalidConfig {
            message: err.to_string(),
        }
    }
}

/// Kind of per-path error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathErrorKind {
    /// Metadata could not be read for the path.
    Metadata,
    /// Error reading a directory entry during traversal.
    Read,
    /// Symbolic link target does not exist.
    BrokenSymlink,
}

/// Non-fatal failure on a single path.
///
/// The affected path is excluded from every result category; the scan
/// continues over the rest of the tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathError {
    /// Path where the error occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of error.
    pub kind: PathErrorKind,
}

impl PathError {
    /// Create a new per-path error.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: PathErrorKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a metadata-read error.
    pub fn metadata(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        Self {
            path: path.into(),
            message: format!("Metadata error: {error}"),
            kind: PathErrorKind::Metadata,
        }
    }

    /// Create a traversal read error.
    pub fn read(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind: PathErrorKind::Read,
        }
    }

    /// Create a broken symlink error.
    pub fn broken_symlink(path: impl Into<PathBuf>, target: &str) -> Self {
        let path = path.into();
        Self {
            message: format!("Broken symlink: {} -> {target}", path.display()),
            path,
            kind: PathErrorKind::BrokenSymlink,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_error_io_classification() {
        let err = InspectError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, InspectError::PermissionDenied { .. }));

        let err = InspectError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, InspectError::NotFound { .. }));
    }

    #[test]
    fn test_path_error_creation() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = PathError::metadata("/test/path", &io_err);
        assert_eq!(err.kind, PathErrorKind::Metadata);
        assert!(err.message.contains("denied"));
    }

    #[test]
    fn test_builder_error_converts_to_invalid_config() {
        let builder_err = crate::config::InspectConfig::builder().build().unwrap_err();
        let err = InspectError::from(builder_err);
        assert!(matches!(err, InspectError::InvalidConfig { .. }));
        assert!(err.to_string().contains("Root path"));
    }

    #[test]
    fn test_broken_symlink_message() {
        let err = PathError::broken_symlink("/a/link", "/gone/target");
        assert_eq!(err.kind, PathErrorKind::BrokenSymlink);
        assert!(err.message.contains("/gone/target"));
    }
}
