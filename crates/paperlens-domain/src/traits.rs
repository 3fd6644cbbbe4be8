//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::failure::FailureKind;
use crate::record::{AnalysisRecord, StoredRecord};
use crate::unit::{DocumentUnit, UnitKey};

/// Trait for the document collection and its persisted output records
///
/// Implemented by the infrastructure layer (paperlens-store)
pub trait RecordStore {
    /// Error type for store operations
    type Error: std::fmt::Display;

    /// Enumerate every unit in stable (lexicographic key) order
    fn units(&self) -> Result<Vec<DocumentUnit>, Self::Error>;

    /// Look up a single unit by key
    fn unit(&self, key: &UnitKey) -> Result<Option<DocumentUnit>, Self::Error>;

    /// Whether the unit currently has an output record on disk
    fn has_record(&self, unit: &DocumentUnit) -> bool;

    /// Load the unit's output record, if present
    fn load_record(&self, unit: &DocumentUnit) -> Result<Option<StoredRecord>, Self::Error>;

    /// Persist the unit's output record, replacing any previous one atomically
    fn write_record(&self, unit: &DocumentUnit, record: &AnalysisRecord) -> Result<(), Self::Error>;

    /// Keep an unparseable model response beside the record for inspection
    fn write_raw_response(&self, unit: &DocumentUnit, raw: &str) -> Result<(), Self::Error>;
}

/// Token counters reported by the model endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenUsage {
    /// Prompt tokens
    pub input_tokens: u64,
    /// Completion tokens
    pub output_tokens: u64,
}

/// One structured-extraction request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Fixed system instruction
    pub system: String,
    /// Per-document user message
    pub user: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Completion token cap
    pub max_tokens: u32,
}

/// Raw model answer plus usage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Response text body as returned by the model
    pub text: String,
    /// Token counters
    pub usage: TokenUsage,
}

/// Errors that map onto the per-document failure taxonomy
pub trait ClassifiedError: std::fmt::Display {
    /// Failure kind recorded for the affected document
    fn failure_kind(&self) -> FailureKind;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (paperlens-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error: ClassifiedError;

    /// Model identifier sent with each request
    fn model_name(&self) -> &str;

    /// Perform exactly one logical request
    fn complete(&self, request: &CompletionRequest) -> Result<Completion, Self::Error>;
}
