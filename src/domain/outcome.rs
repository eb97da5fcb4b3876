//! Request outcome types.
//!
//! A pipeline always ends in an outcome. Failure is data to be tallied, not an
//! error to propagate.

use std::time::Duration;

use crate::http::TransportError;

/// Why a pipeline ended without a 2xx response. Holds the last attempt's error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// A response arrived but its status was outside 200..=299
    Status { status: u16, body: String },
    /// No response arrived
    Transport(TransportError),
    /// The pipeline task aborted abnormally
    Panicked(String),
}

impl FailureReason {
    /// Status code of the last response, if one was received
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FailureReason::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Status { status, .. } => write!(f, "HTTP status {}", status),
            FailureReason::Transport(err) => write!(f, "{}", err),
            FailureReason::Panicked(msg) => write!(f, "pipeline panicked: {}", msg),
        }
    }
}

/// Terminal classification of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// A 2xx response was received
    Success { status: u16, body: String },
    /// Every attempt failed
    Failure(FailureReason),
    /// The batch deadline expired before the pipeline finished
    Cancelled,
}

impl OutcomeStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, OutcomeStatus::Success { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, OutcomeStatus::Cancelled)
    }

    /// Short label used in logs and records
    pub fn label(&self) -> &'static str {
        match self {
            OutcomeStatus::Success { .. } => "success",
            OutcomeStatus::Failure(_) => "failure",
            OutcomeStatus::Cancelled => "cancelled",
        }
    }
}

/// Result of one pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOutcome {
    /// Position in the batch, 0-based
    pub index: usize,
    pub status: OutcomeStatus,
    /// Attempts made, 1 + retries consumed. Only a cancelled pipeline can report 0.
    pub attempts: u32,
    /// Time spent in the pipeline, backoff included. Queueing behind a
    /// concurrency limit does not count.
    pub elapsed: Duration,
}

impl RequestOutcome {
    pub fn success(index: usize, status: u16, body: String, attempts: u32, elapsed: Duration) -> Self {
        Self {
            index,
            status: OutcomeStatus::Success { status, body },
            attempts,
            elapsed,
        }
    }

    pub fn failure(index: usize, reason: FailureReason, attempts: u32, elapsed: Duration) -> Self {
        Self {
            index,
            status: OutcomeStatus::Failure(reason),
            attempts,
            elapsed,
        }
    }

    pub fn cancelled(index: usize, attempts: u32, elapsed: Duration) -> Self {
        Self {
            index,
            status: OutcomeStatus::Cancelled,
            attempts,
            elapsed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_constructors() {
        let ok = RequestOutcome::success(3, 201, "created".into(), 1, Duration::ZERO);
        assert!(ok.is_success());
        assert_eq!(ok.index, 3);
        assert_eq!(ok.status.label(), "success");

        let failed = RequestOutcome::failure(
            4,
            FailureReason::Status {
                status: 500,
                body: String::new(),
            },
            3,
            Duration::ZERO,
        );
        assert!(!failed.is_success());
        assert_eq!(failed.status.label(), "failure");

        let cancelled = RequestOutcome::cancelled(5, 0, Duration::ZERO);
        assert!(cancelled.status.is_cancelled());
        assert!(!cancelled.is_success());
    }

    #[test]
    fn test_failure_reason_status_code() {
        let status = FailureReason::Status {
            status: 429,
            body: "slow down".into(),
        };
        assert_eq!(status.status_code(), Some(429));

        let transport = FailureReason::Transport(TransportError::Timeout("30s".into()));
        assert_eq!(transport.status_code(), None);
    }

    #[test]
    fn test_failure_reason_display() {
        let status = FailureReason::Status {
            status: 503,
            body: String::new(),
        };
        assert_eq!(status.to_string(), "HTTP status 503");

        let transport = FailureReason::Transport(TransportError::Connect("refused".into()));
        assert_eq!(transport.to_string(), "Connection failed: refused");

        let panicked = FailureReason::Panicked("oops".into());
        assert_eq!(panicked.to_string(), "pipeline panicked: oops");
    }
}
