//! Error types for batch operations

use thiserror::Error;

/// Errors that stop a batch before or between units
///
/// Per-unit problems never surface here; they become failure records.
#[derive(Error, Debug)]
pub enum BatchError {
    /// Storage layer error during enumeration
    #[error("Storage error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// `RunScope::Unit` named a folder that does not exist
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),
}
