//! # Output Errors
//!
//! Failures while writing reports and error records.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for report writing.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Filesystem failure.
    #[error("cannot write '{}': {source}", path.display())]
    Io {
        /// Target path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Serialization failure.
    #[error("cannot serialize {what}: {message}")]
    Serialization {
        /// What was being serialized.
        what: &'static str,
        /// Error message.
        message: String,
    },
}

impl OutputError {
    /// Creates an I/O error for `path`.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(what: &'static str, message: impl Into<String>) -> Self {
        Self::Serialization {
            what,
            message: message.into(),
        }
    }
}

/// Result type for output operations.
pub type OutputResult<T> = Result<T, OutputError>;
