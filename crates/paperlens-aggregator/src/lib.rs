//! paperlens Aggregator
//!
//! Collection-level statistics over the per-unit output records.
//!
//! # Overview
//!
//! - **Corpus**: loads every record file, splitting successes from failure
//!   and unreadable records
//! - **Aggregator**: category, score, year, and language histograms plus
//!   normalized method and technique frequency tables
//! - **Report**: the summary rendered as a sectioned text report
//! - **Export**: staging files for downstream synthesis
//!
//! Aggregation only reads records, so it can run while a batch is still
//! writing them.
//!
//! # Usage
//!
//! ```no_run
//! use paperlens_aggregator::{render_report, AggregateConfig, Aggregator, Normalizer};
//! use paperlens_store::{CollectionStore, StoreConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = CollectionStore::open("library", StoreConfig::default())?;
//! let aggregator = Aggregator::new(AggregateConfig::default(), Normalizer::default())?;
//! let summary = aggregator.aggregate(&store)?;
//! println!("{}", render_report(&summary, &aggregator.config().core_label()));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod corpus;
mod error;
mod export;
mod normalize;
mod report;
mod summary;

pub use config::{AggregateConfig, BackgroundQuota};
pub use corpus::{AnalyzedUnit, Corpus, RejectedRecord};
pub use error::AggregateError;
pub use export::{
    write_summary, BackgroundPaperEntry, CorePaperEntry, StagingExport, BACKGROUND_PAPERS_FILE,
    CORE_PAPERS_FILE,
};
pub use normalize::{NormalizationRule, NormalizationRules, Normalizer};
pub use report::{count_bar, percent_bar, render_report};
pub use summary::{
    percent, AggregateSummary, Aggregator, CorePaper, InvalidYears, LabelCount, RecordError,
    TokenTotals, UNKNOWN_LANGUAGE,
};
