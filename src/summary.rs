//! Classification of a finished batch into success and failure counts.

use crate::domain::{BatchResult, RequestOutcome};

/// Counts for one batch. `successes + failures == total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub successes: usize,
    /// Everything that is not a success, cancellations included
    pub failures: usize,
    /// The part of `failures` cut short by a deadline
    pub cancelled: usize,
    pub total_attempts: u64,
}

impl BatchSummary {
    pub fn from_batch(batch: &BatchResult) -> Self {
        let mut summary = Self {
            total: batch.len(),
            ..Self::default()
        };

        for outcome in batch {
            summary.total_attempts += u64::from(outcome.attempts);
            if outcome.is_success() {
                summary.successes += 1;
            } else {
                summary.failures += 1;
                if outcome.status.is_cancelled() {
                    summary.cancelled += 1;
                }
            }
        }

        summary
    }

    pub fn is_any_success(&self) -> bool {
        self.successes > 0
    }
}

/// Split a batch into (successes, failures), keeping index order in each half.
pub fn partition(batch: &BatchResult) -> (Vec<&RequestOutcome>, Vec<&RequestOutcome>) {
    batch.iter().partition(|o| o.is_success())
}
