//! Error types for aggregation

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while aggregating or exporting
#[derive(Error, Debug)]
pub enum AggregateError {
    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(String),

    /// Output file could not be written
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Destination path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Output could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration or rule table
    #[error("Configuration error: {0}")]
    Config(String),
}
