//! Error taxonomy for the brain core.
//!
//! Only `EmptyQuery` and `UnknownCategory` reach callers. The filesystem
//! variants are logged and absorbed where they occur: a missing directory
//! yields an empty listing and a malformed file is skipped.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = BrainError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum BrainError {
    #[error("directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("failed to parse {path}: {source}")]
    FileParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("query is empty")]
    EmptyQuery,

    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

impl BrainError {
    /// Errors caused by caller input rather than corpus state.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, BrainError::EmptyQuery | BrainError::UnknownCategory(_))
    }
}

/// Reject missing or blank queries.
pub fn validate_query(query: &str) -> Result<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(BrainError::EmptyQuery);
    }
    Ok(trimmed)
}
