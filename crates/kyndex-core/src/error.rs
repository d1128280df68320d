//! Error types for the Kyndex crates.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for Kyndex operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur across the Kyndex crates.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// I/O failure, annotated with the path that caused it.
    #[error("i/o error at {}: {source}", .path.display())]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Input that could not be parsed (JSON metadata, setting values).
    #[error("parse error: {0}")]
    Parse(String),

    /// A referenced record does not exist.
    #[error("{kind} not found: {what}")]
    NotFound { what: String, kind: String },

    /// An operation failed for a reason best carried as a message.
    #[error("{0}")]
    Operation(String),
}

impl Error {
    /// I/O error with the offending path attached.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::Io {
            source,
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Parse error from a message.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Missing-record error; `kind` names what was looked up.
    pub fn not_found(what: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::NotFound {
            what: what.into(),
            kind: kind.into(),
        }
    }

    /// General operation failure from a message.
    pub fn operation(message: impl Into<String>) -> Self {
        Self::Operation(message.into())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_display() {
        let err = Error::operation("index commit failed");
        assert_eq!(err.to_string(), "index commit failed");
    }

    #[test]
    fn test_parse_display() {
        let err = Error::parse("invalid metadata JSON");
        assert_eq!(err.to_string(), "parse error: invalid metadata JSON");
    }

    #[test]
    fn test_not_found_display() {
        let err = Error::not_found("42", "search content");
        assert_eq!(err.to_string(), "search content not found: 42");
    }

    #[test]
    fn test_io_with_path_display() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::io_with_path(io, "/tmp/kyndex/state.json");
        let text = err.to_string();
        assert!(text.contains("/tmp/kyndex/state.json"));
        assert!(text.contains("gone"));
    }

    #[test]
    fn test_io_source_preserved() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::io_with_path(io, "/etc/shadow");
        match err {
            Error::Io { source, .. } => {
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
