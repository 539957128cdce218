//! Shared error types for the application

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures while decoding a binary signature database.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("bad magic number: expected {expected:#010x}, found {found:#010x}")]
    BadMagic { expected: u32, found: u32 },

    #[error("unsupported format version {0}")]
    UnsupportedFormatVersion(i32),

    #[error("target version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u64, found: u64 },

    #[error("truncated input while reading {field}")]
    Truncated { field: &'static str },

    #[error("invalid operation type {0}")]
    InvalidOperation(i32),

    #[error("invalid entry kind {0}")]
    InvalidEntryKind(i8),

    #[error("invalid entry: {reason}")]
    InvalidEntry { reason: String },
}

/// Main error type for sigcodegen operations
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed version, operation or annotation text
    #[error("Validation error: {0}")]
    Validation(String),

    /// File system related errors on a named artifact
    #[error("File system error: {message}")]
    FileSystem {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Binary signature database format errors
    #[error(transparent)]
    Format(#[from] FormatError),

    /// A per-file resolver task failed
    #[error("Task failed for {}: {message}", path.display())]
    Task { path: PathBuf, message: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a task error for one input file
    pub fn task(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Task {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file system error for a failed `action` on `path`
    pub fn io_at(action: &str, path: &Path, source: std::io::Error) -> Self {
        Self::FileSystem {
            message: format!("cannot {action} {}: {source}", path.display()),
            path: Some(path.to_path_buf()),
            source: Some(source),
        }
    }

    /// True for errors raised while decoding a database
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for attaching an artifact path to I/O failures
pub trait ResultExt<T> {
    fn with_path(self, action: &str, path: &Path) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_path(self, action: &str, path: &Path) -> Result<T> {
        self.map_err(|source| Error::io_at(action, path, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_path_wraps_io_error() {
        let io: std::result::Result<(), _> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let err = io.with_path("open", Path::new("out/a.sig.db")).unwrap_err();
        match err {
            Error::FileSystem { path, source, message } => {
                assert_eq!(path.as_deref(), Some(Path::new("out/a.sig.db")));
                assert!(source.is_some());
                assert!(message.contains("cannot open out/a.sig.db"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_format_errors_are_distinguishable() {
        let err: Error = FormatError::Truncated { field: "magic" }.into();
        assert!(err.is_format());
        assert_eq!(err.to_string(), "truncated input while reading magic");
        assert!(!Error::Validation("x".into()).is_format());
    }
}
