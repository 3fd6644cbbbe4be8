//! paperlens Batch
//!
//! Crash-safe, resumable batch analysis over a document collection.
//!
//! # Overview
//!
//! The batch runner is responsible for:
//! - **Enumeration**: stable, key-ordered walk over the collection
//! - **Idempotent skip**: a unit with a record is never re-analyzed
//! - **Failure isolation**: every per-unit error becomes a failure record
//! - **Progress and metrics**: periodic checkpoints and a final tally
//!
//! ## Unit Lifecycle
//!
//! | State | Next | Trigger |
//! |-------|------|---------|
//! | **Unseen** | Skipped | Record already present |
//! | **Unseen** | Extracting | Pending unit reached |
//! | **Extracting** | Querying | Text viable |
//! | **Querying** | Validating | Model answered |
//! | **Validating** | Persisted | Record written (success or failure) |
//!
//! Any error along the way short-circuits to a persisted failure record.
//!
//! # Usage
//!
//! ```no_run
//! use paperlens_batch::{BatchConfig, BatchRunner};
//! use paperlens_extractor::{Analyzer, ExtractorConfig, PdfTextExtractor, PromptBuilder};
//! use paperlens_llm::MockProvider;
//! use paperlens_store::{CollectionStore, StoreConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = CollectionStore::open("library", StoreConfig::default())?;
//! let analyzer = Analyzer::new(
//!     MockProvider::new("{}"),
//!     PdfTextExtractor::new(ExtractorConfig::default()),
//!     PromptBuilder::default(),
//! );
//! let runner = BatchRunner::new(store, analyzer, BatchConfig::default())?;
//!
//! let report = runner.dry_run()?;
//! println!("{} to process", report.pending);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod metrics;
mod progress;
mod runner;

pub use config::BatchConfig;
pub use error::BatchError;
pub use metrics::BatchMetrics;
pub use progress::{estimate_remaining, NullProgress, ProgressEvent, ProgressSink, UnitOutcome};
pub use runner::{BatchRunner, DryRunReport, RunScope};
