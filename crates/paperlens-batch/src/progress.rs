//! Progress reporting for batch runs
//!
//! The runner emits events; the caller decides how (and whether) to show them.

use crate::metrics::BatchMetrics;
use paperlens_domain::{FailureKind, UnitKey};
use std::time::Duration;

/// Terminal state of one unit in a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    /// Success record written
    Success,
    /// Failure record written
    Failed(FailureKind),
    /// A record already existed
    Skipped,
    /// The folder has no document file
    NoDocument,
    /// The record could not be persisted; the unit stays pending
    WriteFailed(String),
}

/// A single progress event
#[derive(Debug, Clone)]
pub enum ProgressEvent<'a> {
    /// Work list resolved
    Started {
        /// Units that will be processed
        pending: usize,
        /// Units enumerated in the collection
        total_units: usize,
    },
    /// A unit is about to be processed
    UnitStarted {
        /// 1-based position in the work list
        index: usize,
        /// Work list length
        total: usize,
        /// Unit key
        key: &'a UnitKey,
        /// Document file name
        document: &'a str,
    },
    /// A unit reached a terminal state
    UnitFinished {
        /// 1-based position in the work list
        index: usize,
        /// Work list length
        total: usize,
        /// Unit key
        key: &'a UnitKey,
        /// What happened
        outcome: &'a UnitOutcome,
    },
    /// Periodic tally with an estimate of the remaining time
    Checkpoint {
        /// Units processed so far
        done: usize,
        /// Work list length
        total: usize,
        /// Running metrics
        metrics: &'a BatchMetrics,
        /// Estimated time to finish
        eta: Duration,
    },
}

/// Receives progress events from the runner
pub trait ProgressSink {
    /// Emit a progress event
    fn report(&self, event: &ProgressEvent<'_>);
}

/// No-op sink when progress is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&self, _event: &ProgressEvent<'_>) {}
}

/// Remaining time at the observed rate
///
/// # Examples
///
/// ```
/// use paperlens_batch::estimate_remaining;
/// use std::time::Duration;
///
/// let eta = estimate_remaining(Duration::from_secs(20), 10, 30);
/// assert_eq!(eta, Duration::from_secs(40));
/// ```
pub fn estimate_remaining(elapsed: Duration, done: usize, total: usize) -> Duration {
    if done == 0 || done >= total {
        return Duration::ZERO;
    }
    elapsed.mul_f64((total - done) as f64 / done as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eta_is_zero_when_done_or_unstarted() {
        assert_eq!(estimate_remaining(Duration::from_secs(5), 0, 10), Duration::ZERO);
        assert_eq!(estimate_remaining(Duration::from_secs(5), 10, 10), Duration::ZERO);
    }

    #[test]
    fn test_eta_scales_with_remaining() {
        let eta = estimate_remaining(Duration::from_secs(10), 5, 20);
        assert_eq!(eta, Duration::from_secs(30));
    }
}
