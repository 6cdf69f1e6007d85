//! Error types for upload storage and archive extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ExtractionError`.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Errors that can occur during archive extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive is corrupted, truncated, or otherwise unreadable.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// Entry name resolves outside the extraction directory.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The raw entry name as stored in the archive.
        path: PathBuf,
    },

    /// Entry kind that is never materialized on disk (symlink, hardlink).
    #[error("unsupported {kind} entry: {path}")]
    UnsupportedEntry {
        /// The raw entry name as stored in the archive.
        path: PathBuf,
        /// Human-readable entry kind.
        kind: &'static str,
    },

    /// Operation not permitted by security policy.
    #[error("operation denied by security policy: {reason}")]
    SecurityViolation {
        /// Reason for the violation.
        reason: String,
    },
}

impl ExtractionError {
    /// Returns `true` if this error represents a security violation.
    ///
    /// Security violations are rejections of hostile archive content, as
    /// opposed to ordinary corruption or filesystem failures:
    /// - Path traversal attempts
    /// - Link entries
    /// - General security policy violations (e.g. NUL bytes in names)
    ///
    /// # Examples
    ///
    /// ```
    /// use spacestore_core::ExtractionError;
    /// use std::path::PathBuf;
    ///
    /// let err = ExtractionError::PathTraversal {
    ///     path: PathBuf::from("../etc/passwd"),
    /// };
    /// assert!(err.is_security_violation());
    ///
    /// let err = ExtractionError::InvalidArchive("truncated".into());
    /// assert!(!err.is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(
            self,
            Self::PathTraversal { .. }
                | Self::UnsupportedEntry { .. }
                | Self::SecurityViolation { .. }
        )
    }

    /// Returns a context string for this error, if available.
    ///
    /// # Examples
    ///
    /// ```
    /// use spacestore_core::ExtractionError;
    ///
    /// let err = ExtractionError::InvalidArchive("bad header".to_string());
    /// assert_eq!(err.context(), Some("bad header"));
    /// ```
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::InvalidArchive(msg) => Some(msg),
            Self::SecurityViolation { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Errors raised while loading the API key map.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The key file could not be read.
    #[error("failed to read key file {path}: {source}")]
    Read {
        /// Path of the key file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The key file is not valid JSON of an accepted shape.
    #[error("failed to parse key file: {0}")]
    Parse(#[from] serde_json::Error),

    /// An API key in the file is empty.
    #[error("empty API key in key file")]
    EmptyKey,

    /// A tenant root is not a single plain directory name.
    #[error("invalid tenant root {root:?}: {reason}")]
    InvalidTenantRoot {
        /// The offending tenant root.
        root: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}
