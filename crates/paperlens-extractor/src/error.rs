//! Error types for the Extractor

use paperlens_domain::{ClassifiedError, FailureKind};
use thiserror::Error;

/// Errors that can occur while turning a document into text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// Text layer below the viability threshold, likely a scanned document
    #[error("extracted text too short ({chars} chars), likely a scanned PDF")]
    TooShort {
        /// Characters found after trimming
        chars: usize,
    },

    /// File unreadable or not a parseable document
    #[error("{0}")]
    Failed(String),
}

impl ClassifiedError for ExtractionError {
    fn failure_kind(&self) -> FailureKind {
        match self {
            ExtractionError::TooShort { .. } => FailureKind::TextTooShort,
            ExtractionError::Failed(_) => FailureKind::ExtractionFailed,
        }
    }
}

/// Model output that does not conform to the record schema
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ParseFailure(pub String);

impl ParseFailure {
    pub(crate) fn new(detail: impl Into<String>) -> Self {
        Self(detail.into())
    }
}

/// Why a single document produced no analysis
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}: {detail}", .kind.as_str())]
pub struct AnalysisFailure {
    /// Taxonomy tag written into the failure record
    pub kind: FailureKind,
    /// Human-readable detail
    pub detail: String,
    /// Model response kept for inspection when it failed validation
    pub raw_response: Option<String>,
    /// Tokens consumed before the failure
    pub usage: paperlens_domain::TokenUsage,
}

impl AnalysisFailure {
    /// Failure without a model response
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            raw_response: None,
            usage: Default::default(),
        }
    }

    /// Failure classified by the error itself
    pub fn from_classified<E: ClassifiedError>(error: &E) -> Self {
        Self::new(error.failure_kind(), error.to_string())
    }
}
