//! paperlens Extractor
//!
//! Converts one document into a validated analysis record using an LLM.
//!
//! # Architecture
//!
//! ```text
//! PDF → TextExtractor → PromptBuilder → LlmProvider → parse_analysis → PaperAnalysis
//! ```
//!
//! Every way this can go wrong is reported as an [`AnalysisFailure`] carrying
//! its [`FailureKind`](paperlens_domain::FailureKind); the caller decides
//! what to persist.
//!
//! # Example Usage
//!
//! ```no_run
//! use paperlens_extractor::{Analyzer, ExtractorConfig, PdfTextExtractor, PromptBuilder};
//! use paperlens_llm::MockProvider;
//! use std::path::Path;
//!
//! let config = ExtractorConfig::default();
//! let analyzer = Analyzer::new(
//!     MockProvider::new("{}"),
//!     PdfTextExtractor::new(config.clone()),
//!     PromptBuilder::new(&config.review_language),
//! );
//!
//! match analyzer.analyze(Path::new("library/ABCD1234/paper.pdf")) {
//!     Ok(analysis) => println!("{} -> {}", analysis.title, analysis.primary_category),
//!     Err(failure) => println!("failed: {}", failure),
//! }
//! ```

#![warn(missing_docs)]

mod analyzer;
mod config;
mod error;
mod parser;
mod prompt;
mod text;

#[cfg(test)]
mod tests;

pub use analyzer::{Analyzer, ANALYZED_AT_FORMAT};
pub use config::ExtractorConfig;
pub use error::{AnalysisFailure, ExtractionError, ParseFailure};
pub use parser::{extract_json, parse_analysis};
pub use prompt::PromptBuilder;
pub use text::{finalize_text, ExtractedText, PdfTextExtractor, TextExtractor, TRUNCATION_NOTICE};
