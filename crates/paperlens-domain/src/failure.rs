//! Failure taxonomy for per-document processing

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a per-document failure
///
/// Every kind is converted into a [`FailureRecord`] for the affected document;
/// none of them aborts a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FailureKind {
    /// Extracted text below the viability threshold (likely a scanned PDF)
    TextTooShort,
    /// The document could not be read or parsed
    ExtractionFailed,
    /// Remote endpoint answered HTTP 429
    RateLimited,
    /// Network error, timeout, or non-success response
    RequestFailed,
    /// Model output did not conform to the record schema
    ParseError,
    /// Anything else that went wrong while processing one document
    UnexpectedError,
}

impl FailureKind {
    /// All kinds in taxonomy order
    pub const ALL: [FailureKind; 6] = [
        FailureKind::TextTooShort,
        FailureKind::ExtractionFailed,
        FailureKind::RateLimited,
        FailureKind::RequestFailed,
        FailureKind::ParseError,
        FailureKind::UnexpectedError,
    ];

    /// Stable tag written into failure records
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::TextTooShort => "text_too_short",
            FailureKind::ExtractionFailed => "extraction_failed",
            FailureKind::RateLimited => "rate_limited",
            FailureKind::RequestFailed => "request_failed",
            FailureKind::ParseError => "parse_error",
            FailureKind::UnexpectedError => "unexpected_error",
        }
    }

    /// Parse a stable tag
    pub fn parse(s: &str) -> Option<Self> {
        FailureKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
    }

    /// Whether a later run may plausibly succeed without changing the input
    pub fn is_transient(&self) -> bool {
        matches!(self, FailureKind::RateLimited | FailureKind::RequestFailed)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure variant of an output record: `{ "error": "<kind>: <detail>" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Classification tag, optionally followed by `": "` and a detail message
    pub error: String,
}

impl FailureRecord {
    /// Create a failure record for the given kind
    ///
    /// # Examples
    ///
    /// ```
    /// use paperlens_domain::{FailureKind, FailureRecord};
    ///
    /// let record = FailureRecord::new(FailureKind::TextTooShort, "42 chars");
    /// assert_eq!(record.error, "text_too_short: 42 chars");
    /// assert_eq!(record.kind(), Some(FailureKind::TextTooShort));
    /// ```
    pub fn new(kind: FailureKind, detail: impl AsRef<str>) -> Self {
        let detail = detail.as_ref().trim();
        let error = if detail.is_empty() {
            kind.as_str().to_string()
        } else {
            format!("{}: {}", kind.as_str(), detail)
        };
        Self { error }
    }

    /// Recover the classification from the error string
    ///
    /// Returns `None` for records written by other tools with free-form text.
    pub fn kind(&self) -> Option<FailureKind> {
        let tag = self.error.split(':').next().unwrap_or_default();
        FailureKind::parse(tag)
    }

    /// Detail message after the classification tag, if any
    pub fn detail(&self) -> Option<&str> {
        self.error
            .split_once(':')
            .map(|(_, detail)| detail.trim())
            .filter(|detail| !detail.is_empty())
    }
}
