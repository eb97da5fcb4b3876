//! Outcome sinks.
//!
//! A sink receives every terminal outcome exactly once, as soon as it is
//! known. The dispatcher itself keeps no history; anything that wants one
//! plugs in here.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::domain::{OutcomeStatus, RequestOutcome};

/// Receives terminal outcomes. Called from concurrently running pipelines.
pub trait OutcomeSink: Send + Sync {
    fn record(&self, outcome: &RequestOutcome);
}

/// Discards everything. Used when no sink is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl OutcomeSink for NoopSink {
    fn record(&self, _outcome: &RequestOutcome) {}
}

/// Forwards outcomes over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<RequestOutcome>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RequestOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl OutcomeSink for ChannelSink {
    fn record(&self, outcome: &RequestOutcome) {
        // A dropped receiver just means nobody is listening anymore
        let _ = self.tx.send(outcome.clone());
    }
}

/// Flat, serializable view of an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeRecord {
    pub index: usize,
    pub outcome: &'static str,
    pub attempts: u32,
    pub status_code: Option<u16>,
    pub error: Option<String>,
    pub elapsed_ms: u64,
    pub recorded_at: DateTime<Utc>,
}

impl OutcomeRecord {
    pub fn new(outcome: &RequestOutcome, recorded_at: DateTime<Utc>) -> Self {
        let (status_code, error) = match &outcome.status {
            OutcomeStatus::Success { status, .. } => (Some(*status), None),
            OutcomeStatus::Failure(reason) => (reason.status_code(), Some(reason.to_string())),
            OutcomeStatus::Cancelled => (None, Some("batch deadline expired".to_string())),
        };

        Self {
            index: outcome.index,
            outcome: outcome.status.label(),
            attempts: outcome.attempts,
            status_code,
            error,
            elapsed_ms: outcome.elapsed.as_millis() as u64,
            recorded_at,
        }
    }
}

/// Writes each outcome as a JSON line to the debug log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl OutcomeSink for LogSink {
    fn record(&self, outcome: &RequestOutcome) {
        let record = OutcomeRecord::new(outcome, Utc::now());
        match serde_json::to_string(&record) {
            Ok(line) => log::debug!("outcome {}", line),
            Err(e) => log::warn!("Failed to serialize outcome {}: {}", outcome.index, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FailureReason;
    use crate::http::TransportError;
    use chrono::TimeZone;
    use std::time::Duration;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap()
    }

    #[tokio::test]
    async fn test_channel_sink_forwards() {
        let (sink, mut rx) = ChannelSink::new();
        let outcome = RequestOutcome::success(1, 200, "ok".into(), 1, Duration::ZERO);

        sink.record(&outcome);

        assert_eq!(rx.recv().await, Some(outcome));
    }

    #[test]
    fn test_channel_sink_survives_dropped_receiver() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        sink.record(&RequestOutcome::cancelled(0, 0, Duration::ZERO));
    }

    #[test]
    fn test_record_for_success() {
        let outcome = RequestOutcome::success(2, 201, "created".into(), 2, Duration::from_millis(75));
        let record = OutcomeRecord::new(&outcome, fixed_time());

        assert_eq!(record.outcome, "success");
        assert_eq!(record.status_code, Some(201));
        assert_eq!(record.error, None);
        assert_eq!(record.elapsed_ms, 75);
    }

    #[test]
    fn test_record_for_transport_failure() {
        let outcome = RequestOutcome::failure(
            0,
            FailureReason::Transport(TransportError::Connect("refused".into())),
            3,
            Duration::from_millis(100),
        );
        let record = OutcomeRecord::new(&outcome, fixed_time());

        assert_eq!(record.outcome, "failure");
        assert_eq!(record.status_code, None);
        assert_eq!(record.error.as_deref(), Some("Connection failed: refused"));
    }

    #[test]
    fn test_log_sink_accepts_every_outcome_kind() {
        let outcomes = [
            RequestOutcome::success(0, 200, "ok".into(), 1, Duration::from_millis(5)),
            RequestOutcome::failure(
                1,
                FailureReason::Transport(TransportError::Timeout("slow".into())),
                3,
                Duration::from_millis(100),
            ),
            RequestOutcome::cancelled(2, 0, Duration::ZERO),
        ];

        for outcome in &outcomes {
            LogSink.record(outcome);
        }
    }

    #[test]
    fn test_record_for_cancelled() {
        let outcome = RequestOutcome::cancelled(6, 1, Duration::from_millis(40));
        let record = OutcomeRecord::new(&outcome, fixed_time());

        assert_eq!(record.outcome, "cancelled");
        assert_eq!(record.status_code, None);
        assert_eq!(record.error.as_deref(), Some("batch deadline expired"));
        assert_eq!(record.attempts, 1);
    }

    #[test]
    fn test_record_serializes() {
        let outcome = RequestOutcome::failure(
            4,
            FailureReason::Status {
                status: 503,
                body: String::new(),
            },
            3,
            Duration::ZERO,
        );
        let record = OutcomeRecord::new(&outcome, fixed_time());
        let json: serde_json::Value = serde_json::to_value(&record).unwrap();

        assert_eq!(json["index"], 4);
        assert_eq!(json["outcome"], "failure");
        assert_eq!(json["status_code"], 503);
        assert_eq!(json["recorded_at"], "2026-01-02T03:04:05Z");
    }
}
