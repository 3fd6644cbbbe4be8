//! Loading every record of a collection into memory

use crate::error::AggregateError;
use paperlens_domain::{AnalysisRecord, FailureKind, PaperAnalysis, RecordStore, StoredRecord, UnitKey};
use tracing::{debug, warn};

/// A successfully analyzed unit
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedUnit {
    /// Unit key
    pub key: UnitKey,
    /// The stored analysis
    pub analysis: PaperAnalysis,
}

/// Why a record counts as a parse error in the summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectedRecord {
    /// A failure record; `kind` is `None` when the tag is not recognized
    Failure {
        /// Failure category
        kind: Option<FailureKind>,
        /// The record's `error` text
        error: String,
    },
    /// The file exists but is not a valid record
    Malformed {
        /// Why it was rejected
        reason: String,
    },
}

impl RejectedRecord {
    /// Tag used in the summary's error-kind histogram
    pub fn tag(&self) -> &'static str {
        match self {
            RejectedRecord::Failure {
                kind: Some(kind), ..
            } => kind.as_str(),
            RejectedRecord::Failure { kind: None, .. } => "unclassified",
            RejectedRecord::Malformed { .. } => "malformed",
        }
    }

    /// Human-readable reason
    pub fn reason(&self) -> &str {
        match self {
            RejectedRecord::Failure { error, .. } => error,
            RejectedRecord::Malformed { reason } => reason,
        }
    }
}

/// Every record file of a collection, split by outcome
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    /// Units with a success record, in key order
    pub analyzed: Vec<AnalyzedUnit>,
    /// Units with a failure or unreadable record, in key order
    pub rejected: Vec<(UnitKey, RejectedRecord)>,
}

impl Corpus {
    /// Read every unit's record from `store`
    ///
    /// Units without a record are ignored; they have not been processed yet.
    pub fn load<S: RecordStore>(store: &S) -> Result<Self, AggregateError> {
        let mut corpus = Corpus::default();

        for unit in store
            .units()
            .map_err(|e| AggregateError::Store(e.to_string()))?
        {
            let stored = store
                .load_record(&unit)
                .map_err(|e| AggregateError::Store(e.to_string()))?;

            match stored {
                None => continue,
                Some(StoredRecord::Parsed(AnalysisRecord::Success(analysis))) => {
                    corpus.analyzed.push(AnalyzedUnit {
                        key: unit.key,
                        analysis: *analysis,
                    });
                }
                Some(StoredRecord::Parsed(AnalysisRecord::Failure(failure))) => {
                    debug!(unit = %unit.key, error = %failure.error, "Failure record");
                    let kind = failure.kind();
                    corpus.rejected.push((
                        unit.key,
                        RejectedRecord::Failure {
                            kind,
                            error: failure.error,
                        },
                    ));
                }
                Some(StoredRecord::Malformed { reason }) => {
                    warn!(unit = %unit.key, %reason, "Malformed record");
                    corpus
                        .rejected
                        .push((unit.key, RejectedRecord::Malformed { reason }));
                }
            }
        }

        Ok(corpus)
    }

    /// Number of record files seen
    pub fn total(&self) -> usize {
        self.analyzed.len() + self.rejected.len()
    }
}
