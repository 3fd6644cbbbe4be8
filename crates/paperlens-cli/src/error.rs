//! Error types for the CLI application.

use paperlens_aggregator::AggregateError;
use paperlens_batch::BatchError;
use paperlens_llm::LlmError;
use paperlens_store::StoreError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model client could not be set up
    #[error("Model client error: {0}")]
    Llm(#[from] LlmError),

    /// Collection could not be opened or read
    #[error("Collection error: {0}")]
    Store(#[from] StoreError),

    /// Batch run aborted before processing
    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),

    /// Aggregation or export failed
    #[error("Aggregation error: {0}")]
    Aggregate(#[from] AggregateError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
