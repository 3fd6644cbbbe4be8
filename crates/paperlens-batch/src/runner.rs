//! Core batch runner: enumerate, process, persist

use crate::{BatchConfig, BatchError, BatchMetrics};
use crate::progress::{estimate_remaining, ProgressEvent, ProgressSink, UnitOutcome};
use paperlens_domain::{
    AnalysisRecord, DocumentUnit, FailureKind, LlmProvider, RecordStore, TokenUsage, UnitKey,
};
use paperlens_extractor::{AnalysisFailure, Analyzer, TextExtractor};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{info, warn};

/// Which units a run covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunScope {
    /// Every pending unit
    All,
    /// The first `n` pending units in key order
    Limit(usize),
    /// Exactly this unit, replacing any existing record
    Unit(UnitKey),
}

/// Collection counts without touching the model or the disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DryRunReport {
    /// Unit folders enumerated
    pub total_units: usize,
    /// Folders containing a document file
    pub with_document: usize,
    /// Folders that already have a record
    pub done: usize,
    /// Units a run would process
    pub pending: usize,
    /// Folders without a document file
    pub no_document: usize,
}

impl DryRunReport {
    /// Count the collection's units by state
    ///
    /// Needs only the store, so it works before a model client exists.
    pub fn scan<S: RecordStore>(store: &S) -> Result<Self, BatchError> {
        let units = store
            .units()
            .map_err(|e| BatchError::Store(e.to_string()))?;

        let mut report = DryRunReport {
            total_units: units.len(),
            ..DryRunReport::default()
        };
        for unit in &units {
            if unit.document.is_some() {
                report.with_document += 1;
            } else {
                report.no_document += 1;
            }
            if unit.has_record {
                report.done += 1;
            }
            if unit.is_pending() {
                report.pending += 1;
            }
        }
        Ok(report)
    }
}

/// Batch orchestrator over a record store
///
/// Processes units sequentially and writes each record as soon as the unit
/// completes, so an interrupted run loses at most the unit in flight.
///
/// # Examples
///
/// ```no_run
/// use paperlens_batch::{BatchConfig, BatchRunner, NullProgress, RunScope};
/// use paperlens_extractor::{Analyzer, ExtractorConfig, PdfTextExtractor, PromptBuilder};
/// use paperlens_llm::MockProvider;
/// use paperlens_store::{CollectionStore, StoreConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = CollectionStore::open("library", StoreConfig::default())?;
/// let analyzer = Analyzer::new(
///     MockProvider::new("{}"),
///     PdfTextExtractor::new(ExtractorConfig::default()),
///     PromptBuilder::default(),
/// );
/// let runner = BatchRunner::new(store, analyzer, BatchConfig::default())?;
///
/// let metrics = runner.run(RunScope::Limit(5), &NullProgress)?;
/// println!("{}", metrics.summary());
/// # Ok(())
/// # }
/// ```
pub struct BatchRunner<S, L, X> {
    store: S,
    analyzer: Analyzer<L, X>,
    config: BatchConfig,
}

impl<S, L, X> BatchRunner<S, L, X>
where
    S: RecordStore,
    L: LlmProvider,
    X: TextExtractor,
{
    /// Create a runner
    pub fn new(store: S, analyzer: Analyzer<L, X>, config: BatchConfig) -> Result<Self, BatchError> {
        config.validate().map_err(BatchError::Config)?;
        Ok(Self {
            store,
            analyzer,
            config,
        })
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The analyzer
    pub fn analyzer(&self) -> &Analyzer<L, X> {
        &self.analyzer
    }

    /// Count what a run would do; no remote calls, no writes
    pub fn dry_run(&self) -> Result<DryRunReport, BatchError> {
        DryRunReport::scan(&self.store)
    }

    /// Process the units in `scope`
    ///
    /// Only configuration problems (unknown unit, unreadable collection) are
    /// errors; every per-unit failure is persisted as a failure record.
    pub fn run(&self, scope: RunScope, sink: &dyn ProgressSink) -> Result<BatchMetrics, BatchError> {
        let start = Instant::now();
        let mut metrics = BatchMetrics::new();

        let (work, total_units) = match &scope {
            RunScope::Unit(key) => {
                let unit = self
                    .store
                    .unit(key)
                    .map_err(|e| BatchError::Store(e.to_string()))?
                    .ok_or_else(|| BatchError::UnknownUnit(key.to_string()))?;
                if unit.document.is_none() {
                    warn!(unit = %unit.key, "No document file in unit");
                    metrics.record(&UnitOutcome::NoDocument);
                    (Vec::new(), 1)
                } else {
                    (vec![unit], 1)
                }
            }
            RunScope::All | RunScope::Limit(_) => {
                let units = self.units()?;
                let total_units = units.len();
                let mut pending = Vec::new();
                for unit in units {
                    if unit.document.is_none() {
                        metrics.record(&UnitOutcome::NoDocument);
                    } else if unit.has_record {
                        metrics.record(&UnitOutcome::Skipped);
                    } else {
                        pending.push(unit);
                    }
                }
                if let RunScope::Limit(n) = &scope {
                    pending.truncate(*n);
                }
                (pending, total_units)
            }
        };

        let total = work.len();
        info!(pending = total, total_units, skipped = metrics.skipped, "Starting batch");
        sink.report(&ProgressEvent::Started {
            pending: total,
            total_units,
        });

        for (i, unit) in work.iter().enumerate() {
            let index = i + 1;
            sink.report(&ProgressEvent::UnitStarted {
                index,
                total,
                key: &unit.key,
                document: unit.document_name().unwrap_or("?"),
            });

            let (outcome, usage) = self.process_unit(unit);
            metrics.record(&outcome);
            metrics.record_usage(usage);

            sink.report(&ProgressEvent::UnitFinished {
                index,
                total,
                key: &unit.key,
                outcome: &outcome,
            });

            if index % self.config.progress_interval == 0 && index < total {
                metrics.elapsed = start.elapsed();
                sink.report(&ProgressEvent::Checkpoint {
                    done: index,
                    total,
                    metrics: &metrics,
                    eta: estimate_remaining(metrics.elapsed, index, total),
                });
            }
        }

        metrics.elapsed = start.elapsed();
        info!(
            success = metrics.success,
            failed = metrics.total_failed(),
            elapsed_secs = metrics.elapsed.as_secs(),
            "Batch finished"
        );
        Ok(metrics)
    }

    fn units(&self) -> Result<Vec<DocumentUnit>, BatchError> {
        self.store
            .units()
            .map_err(|e| BatchError::Store(e.to_string()))
    }

    /// Take one unit from pending to a persisted record
    fn process_unit(&self, unit: &DocumentUnit) -> (UnitOutcome, TokenUsage) {
        let Some(document) = unit.document.as_deref() else {
            return (UnitOutcome::NoDocument, TokenUsage::default());
        };
        info!(unit = %unit.key, document = %document.display(), "Processing unit");

        let result = panic::catch_unwind(AssertUnwindSafe(|| self.analyzer.analyze(document)))
            .unwrap_or_else(|payload| {
                Err(AnalysisFailure::new(
                    FailureKind::UnexpectedError,
                    panic_message(payload.as_ref()),
                ))
            });

        let (record, usage) = match result {
            Ok(analysis) => {
                let usage = TokenUsage {
                    input_tokens: analysis.meta.input_tokens,
                    output_tokens: analysis.meta.output_tokens,
                };
                (AnalysisRecord::Success(Box::new(analysis)), usage)
            }
            Err(failure) => {
                warn!(unit = %unit.key, kind = %failure.kind, "Unit failed: {}", failure.detail);
                if let (Some(raw), true) = (&failure.raw_response, self.config.write_raw_responses) {
                    if let Err(e) = self.store.write_raw_response(unit, raw) {
                        warn!(unit = %unit.key, "Could not keep raw response: {}", e);
                    }
                }
                (AnalysisRecord::failure(failure.kind, &failure.detail), failure.usage)
            }
        };

        let outcome = match self.store.write_record(unit, &record) {
            Ok(()) => match record.failure_kind() {
                None => UnitOutcome::Success,
                Some(kind) => UnitOutcome::Failed(kind),
            },
            Err(e) => {
                warn!(unit = %unit.key, "Could not write record: {}", e);
                UnitOutcome::WriteFailed(e.to_string())
            }
        };
        (outcome, usage)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panic: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panic: {}", message)
    } else {
        "panic while processing unit".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_variants() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "panic: boom");

        let payload: Box<dyn Any + Send> = Box::new(String::from("bad index"));
        assert_eq!(panic_message(payload.as_ref()), "panic: bad index");

        let payload: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(payload.as_ref()), "panic while processing unit");
    }
}
