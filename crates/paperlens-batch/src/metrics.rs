//! Metrics collected during a batch run

use crate::progress::UnitOutcome;
use paperlens_domain::{FailureKind, TokenUsage};
use std::collections::BTreeMap;
use std::time::Duration;

/// Tally of one batch run
///
/// Tracks outcomes per unit, token usage, and elapsed time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchMetrics {
    /// Units that received a success record
    pub success: usize,

    /// Units that received a failure record, per kind
    pub failures: BTreeMap<FailureKind, usize>,

    /// Units skipped because a record already existed
    pub skipped: usize,

    /// Units without a document file
    pub no_document: usize,

    /// Units whose record could not be written (they stay pending)
    pub write_failed: usize,

    /// Prompt tokens consumed
    pub input_tokens: u64,

    /// Completion tokens consumed
    pub output_tokens: u64,

    /// Wall-clock time spent processing
    pub elapsed: Duration,
}

impl BatchMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one processed unit
    pub fn record(&mut self, outcome: &UnitOutcome) {
        match outcome {
            UnitOutcome::Success => self.success += 1,
            UnitOutcome::Failed(kind) => *self.failures.entry(*kind).or_insert(0) += 1,
            UnitOutcome::Skipped => self.skipped += 1,
            UnitOutcome::NoDocument => self.no_document += 1,
            UnitOutcome::WriteFailed(_) => self.write_failed += 1,
        }
    }

    /// Add tokens consumed by one request
    pub fn record_usage(&mut self, usage: TokenUsage) {
        self.input_tokens += usage.input_tokens;
        self.output_tokens += usage.output_tokens;
    }

    /// Failure records written for `kind`
    pub fn failed(&self, kind: FailureKind) -> usize {
        self.failures.get(&kind).copied().unwrap_or(0)
    }

    /// Failure records written across all kinds
    pub fn total_failed(&self) -> usize {
        self.failures.values().sum()
    }

    /// Units that were attempted in this run
    pub fn processed(&self) -> usize {
        self.success + self.total_failed() + self.write_failed
    }

    /// Whether the endpoint pushed back during the run
    pub fn was_rate_limited(&self) -> bool {
        self.failed(FailureKind::RateLimited) > 0
    }

    /// Generate the final tally
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Batch Summary".to_string(),
            "=============".to_string(),
            format!("Time: {:.1} min", self.elapsed.as_secs_f64() / 60.0),
            format!("Success: {}", self.success),
            format!("Skipped: {}", self.skipped),
            format!("No document: {}", self.no_document),
            format!("Failed: {}", self.total_failed()),
        ];

        for (kind, count) in &self.failures {
            lines.push(format!("  {}: {}", kind, count));
        }
        if self.write_failed > 0 {
            lines.push(format!("Write failed: {}", self.write_failed));
        }
        lines.push(format!(
            "Tokens: {} in / {} out",
            self.input_tokens, self.output_tokens
        ));

        if self.was_rate_limited() {
            lines.push(String::new());
            lines.push(
                "Hint: requests were rate limited; raise request_delay_ms and re-run".to_string(),
            );
        }

        lines.join("\n")
    }
}
