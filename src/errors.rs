//! Defines application-specific error types.
//!
//! This module provides the `Error` enum, which categorizes the errors that can
//! occur while resolving a URL, talking to the remote API, writing files, or
//! coordinating the concurrent download.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// A `Result` alias using the crate's [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors used throughout `dirgrab`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    // --- URL Errors ---
    /// The URL does not start with `https://github.com/` or `github.com/`.
    #[error("url must start with https://github.com/ or github.com/")]
    InvalidSource,

    /// The URL does not have the `owner/repo/tree/ref/path` shape.
    #[error("url format must be: https://github.com/owner/repo/tree/branch/directory")]
    InvalidFormat,

    // --- Remote Errors ---
    /// Listing a remote path failed (transport error, non-2xx status, or bad payload).
    #[error("failed to get contents of '{path}': {reason}")]
    ContentsUnavailable {
        /// The repository path that was being listed.
        path: String,
        /// Human readable cause.
        reason: String,
    },

    /// Fetching the raw bytes of a file failed.
    #[error("failed to fetch '{url}': {reason}")]
    FetchFailed {
        /// The download URL.
        url: String,
        /// Human readable cause.
        reason: String,
    },

    /// A file entry was missing its path or download URL.
    #[error("invalid url or path (path: '{path}', url: '{url}')")]
    InvalidPathUrl { path: String, url: String },

    /// Fetching the rate limit counters failed.
    #[error("failed to get rate limit: {0}")]
    RateLimitUnavailable(String),

    /// Fetching the authenticated user failed.
    #[error("failed to get authenticated user: {0}")]
    AuthUnavailable(String),

    // --- Local Errors ---
    /// The destination of a remote path falls outside the output root.
    #[error("refusing to write '{path}': not within '{base}'")]
    PathEscape {
        /// The remote path that was rejected.
        path: String,
        /// The root path it was expected to live under.
        base: String,
    },

    /// Error occurring while creating directories or writing a file.
    #[error("I/O error accessing path '{path}': {source}")]
    Io {
        /// The path that caused the I/O error.
        path: String,
        /// The underlying `std::io::Error`.
        #[source]
        source: std::io::Error,
    },

    // --- Coordination ---
    /// The whole download took longer than the configured deadline.
    #[error("took more than {} seconds to download contents", .0.as_secs())]
    DeadlineExceeded(Duration),

    /// The operation was cancelled by the user (e.g., Ctrl+C).
    #[error("Operation cancelled by user (Ctrl+C)")]
    Cancelled,

    /// Several workers failed while running with the collect-all error policy.
    #[error("{}", MultipleDisplay(.0))]
    Multiple(Vec<Error>),

    // --- Configuration Errors ---
    /// Invalid configuration settings or combinations.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Persisting or removing the credential failed.
    #[error("Credential store error: {0}")]
    Credential(String),
}

struct MultipleDisplay<'a>(&'a [Error]);

impl fmt::Display for MultipleDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} errors occurred", self.0.len())?;
        for err in self.0 {
            write!(f, "\n  - {}", err)?;
        }
        Ok(())
    }
}

impl Error {
    /// Returns `true` for errors caused by cancellation rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

/// Helper function to create an `Error::Io` with path context.
pub fn io_error_with_path<P: AsRef<std::path::Path>>(source: std::io::Error, path: P) -> Error {
    Error::Io {
        path: path.as_ref().display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{io, path::PathBuf};

    #[test]
    fn test_io_error_with_path_helper() {
        let path = PathBuf::from("some/test/path.txt");
        let source_error = io::Error::new(io::ErrorKind::NotFound, "File not found");

        match io_error_with_path(source_error, &path) {
            Error::Io {
                path: error_path,
                source,
            } => {
                assert!(error_path.contains("some/test/path.txt"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("Expected Error::Io, got {:?}", other),
        }
    }

    #[test]
    fn test_deadline_message_uses_seconds() {
        let err = Error::DeadlineExceeded(Duration::from_secs(60));
        assert_eq!(
            err.to_string(),
            "took more than 60 seconds to download contents"
        );
    }

    #[test]
    fn test_multiple_lists_every_error() {
        let err = Error::Multiple(vec![
            Error::InvalidPathUrl {
                path: String::new(),
                url: "u".into(),
            },
            Error::ContentsUnavailable {
                path: "docs".into(),
                reason: "404 Not Found".into(),
            },
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("2 errors occurred"));
        assert!(msg.contains("failed to get contents of 'docs': 404 Not Found"));
    }
}
