//! Error types for the validator
//!
//! These are runtime failures that stop a run. Problems found *in* the corpus
//! are reported as [`Finding`](crate::Finding)s instead.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for validator operations
pub type Result<T> = std::result::Result<T, SkillError>;

/// Errors that abort a validation run
#[derive(Debug, Error)]
pub enum SkillError {
    /// Filesystem I/O error on a specific path
    #[error("IO error on {}: {source}", path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Walkdir error during directory traversal
    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Skills directory missing or not a directory
    #[error("Invalid skills directory: {0}")]
    InvalidDirectory(String),

    /// Report could not be written to its destination
    #[error("Failed to write report: {0}")]
    Render(#[source] std::io::Error),

    /// Report could not be serialized
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SkillError {
    /// Create a new `Io` error for `path`
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a new `InvalidDirectory` error
    pub fn invalid_directory(msg: impl Into<String>) -> Self {
        Self::InvalidDirectory(msg.into())
    }
}
