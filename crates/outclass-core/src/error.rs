//! Error types for card lookup.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a card catalog.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for lookup operations.
pub type Result<T> = std::result::Result<T, LookupError>;
