//! paperlens Domain Layer
//!
//! This crate contains the core data model for paperlens. It performs no I/O
//! and defines the records, labels, and trait interfaces that all other
//! layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Document Unit**: one source document folder, keyed by its folder name
//! - **Output Record**: the success or failure result of analyzing one unit
//! - **Category**: closed A-F classification label set
//! - **Relevance Score**: bounded integer in 1..=5
//! - **Failure Kind**: per-document error taxonomy written into failure records
//!
//! ## Architecture
//!
//! - Only `serde` as an external dependency (records are the wire format)
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod category;
pub mod failure;
pub mod record;
pub mod traits;
pub mod unit;

// Re-exports for convenience
pub use category::Category;
pub use failure::{FailureKind, FailureRecord};
pub use record::{
    AnalysisMeta, AnalysisRecord, Field, Language, PaperAnalysis, RelevanceScore, StoredRecord,
};
pub use traits::{
    ClassifiedError, Completion, CompletionRequest, LlmProvider, RecordStore, TokenUsage,
};
pub use unit::{DocumentUnit, UnitKey};
