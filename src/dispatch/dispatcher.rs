//! Batch dispatcher.
//!
//! Fans a request out into `n` independent pipelines, one tokio task each,
//! and joins them all before returning. Results come back ordered by
//! request index no matter which pipeline finished first.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tokio::time::Instant;

use crate::dispatch::sink::{NoopSink, OutcomeSink};
use crate::domain::{BatchResult, FailureReason, RequestOutcome};
use crate::error::{Result, VolleyError};
use crate::http::{HttpClient, PostRequest};
use crate::retry::{RetryPolicy, execute_tracked};

/// Optional limits on a dispatch. The default has neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Most pipelines allowed in flight at once. `None` runs the whole batch at once.
    pub max_in_flight: Option<usize>,
    /// Overall deadline. Pipelines still running when it expires are reported as cancelled.
    pub deadline: Option<Duration>,
}

impl DispatchOptions {
    pub fn with_max_in_flight(mut self, limit: usize) -> Self {
        self.max_in_flight = Some(limit);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.max_in_flight == Some(0) {
            return Err(VolleyError::InvalidOptions(
                "max_in_flight must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// What is known about a pipeline that may never report back.
#[derive(Default)]
struct PipelineProgress {
    attempts: AtomicU32,
    /// Set once the pipeline is past the concurrency limiter
    started: OnceLock<Instant>,
}

impl PipelineProgress {
    fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Time actually spent running. Zero if it never left the queue.
    fn elapsed(&self) -> Duration {
        self.started.get().map(|s| s.elapsed()).unwrap_or(Duration::ZERO)
    }
}

/// Issues POSTs through a shared client under a fixed retry policy.
pub struct Dispatcher {
    client: Arc<dyn HttpClient>,
    policy: RetryPolicy,
    options: DispatchOptions,
    sink: Arc<dyn OutcomeSink>,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn HttpClient>, policy: RetryPolicy) -> Self {
        Self {
            client,
            policy,
            options: DispatchOptions::default(),
            sink: Arc::new(NoopSink),
        }
    }

    /// Apply dispatch limits. Rejects a concurrency ceiling of zero.
    pub fn with_options(mut self, options: DispatchOptions) -> Result<Self> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    /// Send every terminal outcome to `sink`
    pub fn with_sink(mut self, sink: Arc<dyn OutcomeSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn options(&self) -> &DispatchOptions {
        &self.options
    }

    /// Run a single pipeline as a batch of one, so the deadline and panic
    /// isolation apply to it too. Its index is 0.
    pub async fn dispatch_one(&self, request: &PostRequest) -> RequestOutcome {
        // A batch of one always holds exactly one outcome
        self.dispatch(request, 1).await.into_outcomes().remove(0)
    }

    /// Run `count` pipelines concurrently and wait for all of them.
    ///
    /// Never fails as a whole: every slot ends up as a success, a failure, or
    /// (only with a deadline) a cancellation.
    pub async fn dispatch(&self, request: &PostRequest, count: usize) -> BatchResult {
        if count == 0 {
            return BatchResult::default();
        }

        let started = Instant::now();
        tracing::info!(
            count,
            url = %request.url,
            max_in_flight = ?self.options.max_in_flight,
            deadline_ms = ?self.options.deadline.map(|d| d.as_millis() as u64),
            "Dispatching batch"
        );

        let request = Arc::new(request.clone());
        let limiter = self.options.max_in_flight.map(|limit| Arc::new(Semaphore::new(limit)));
        let progress: Arc<Vec<PipelineProgress>> = Arc::new((0..count).map(|_| PipelineProgress::default()).collect());

        let mut tasks = JoinSet::new();
        let mut task_index = HashMap::with_capacity(count);

        for index in 0..count {
            let client = self.client.clone();
            let request = request.clone();
            let policy = self.policy;
            let limiter = limiter.clone();
            let progress = progress.clone();
            let sink = self.sink.clone();

            let handle = tasks.spawn(async move {
                let _permit = match limiter {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                let slot = &progress[index];
                let _ = slot.started.set(Instant::now());
                let outcome = execute_tracked(client.as_ref(), &request, &policy, index, &slot.attempts).await;
                sink.record(&outcome);
                outcome
            });
            task_index.insert(handle.id(), index);
        }

        let mut slots: Vec<Option<RequestOutcome>> = vec![None; count];

        let deadline_hit = {
            let collect = async {
                while let Some(joined) = tasks.join_next().await {
                    self.absorb(joined, &task_index, &progress, &mut slots);
                }
            };

            match self.options.deadline {
                Some(deadline) => tokio::time::timeout(deadline, collect).await.is_err(),
                None => {
                    collect.await;
                    false
                }
            }
        };

        if deadline_hit {
            tracing::warn!(
                remaining = tasks.len(),
                "Batch deadline expired, cancelling unfinished pipelines"
            );
            tasks.abort_all();
            // Pipelines that finished before the abort landed still count
            while let Some(joined) = tasks.join_next().await {
                self.absorb(joined, &task_index, &progress, &mut slots);
            }
        }

        let outcomes: Vec<RequestOutcome> = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| match slot {
                Some(outcome) => outcome,
                None => {
                    let slot = &progress[index];
                    let outcome = if deadline_hit {
                        RequestOutcome::cancelled(index, slot.attempts(), slot.elapsed())
                    } else {
                        RequestOutcome::failure(
                            index,
                            FailureReason::Panicked("pipeline ended without an outcome".to_string()),
                            slot.attempts(),
                            slot.elapsed(),
                        )
                    };
                    self.sink.record(&outcome);
                    outcome
                }
            })
            .collect();

        let batch = BatchResult::from_outcomes(outcomes);
        let successes = batch.iter().filter(|o| o.is_success()).count();
        tracing::info!(
            count,
            successes,
            failures = count - successes,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Batch complete"
        );

        batch
    }

    /// Place a joined pipeline's outcome in its slot. Panics become failures;
    /// aborted pipelines are left empty for the caller to mark cancelled.
    fn absorb(
        &self,
        joined: std::result::Result<RequestOutcome, JoinError>,
        task_index: &HashMap<tokio::task::Id, usize>,
        progress: &[PipelineProgress],
        slots: &mut [Option<RequestOutcome>],
    ) {
        match joined {
            Ok(outcome) => {
                let index = outcome.index;
                slots[index] = Some(outcome);
            }
            Err(err) if err.is_cancelled() => {}
            Err(err) => {
                let Some(&index) = task_index.get(&err.id()) else {
                    tracing::error!(error = %err, "Unknown pipeline task failed");
                    return;
                };
                let message = panic_message(err);
                tracing::error!(index, error = %message, "Pipeline panicked");

                let outcome = RequestOutcome::failure(
                    index,
                    FailureReason::Panicked(message),
                    progress[index].attempts(),
                    progress[index].elapsed(),
                );
                self.sink.record(&outcome);
                slots[index] = Some(outcome);
            }
        }
    }
}

fn panic_message(err: JoinError) -> String {
    match err.try_into_panic() {
        Ok(payload) => {
            if let Some(s) = payload.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_string()
            }
        }
        Err(err) => err.to_string(),
    }
}
