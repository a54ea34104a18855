//! Error type shared by the MET parser and store

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a match equity table
#[derive(Debug, Error)]
pub enum MetError {
    /// The source text is missing required sections or carries no usable data
    #[error("malformed match equity table: {0}")]
    Format(String),

    /// A table file could not be read from disk
    #[error("failed to read match equity table {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MetError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        MetError::Format(msg.into())
    }
}

/// Result alias for MET operations
pub type Result<T> = std::result::Result<T, MetError>;
