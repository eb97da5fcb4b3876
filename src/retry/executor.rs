//! Single-request executor: one POST wrapped in a retry loop.
//!
//! Transport errors and non-2xx statuses are treated the same way: both use
//! up an attempt and both are followed by the backoff sleep, unless that was
//! the last attempt.

use std::sync::atomic::{AtomicU32, Ordering};

use tokio::time::Instant;

use crate::domain::{FailureReason, RequestOutcome};
use crate::http::{HttpClient, PostRequest};
use crate::retry::policy::RetryPolicy;

/// Run one pipeline to completion and report its outcome.
pub async fn execute_with_retry(
    client: &dyn HttpClient,
    request: &PostRequest,
    policy: &RetryPolicy,
    index: usize,
) -> RequestOutcome {
    let progress = AtomicU32::new(0);
    execute_tracked(client, request, policy, index, &progress).await
}

/// Same as [`execute_with_retry`], publishing the number of attempts started
/// into `progress` so a caller can still report it if the pipeline is aborted.
pub async fn execute_tracked(
    client: &dyn HttpClient,
    request: &PostRequest,
    policy: &RetryPolicy,
    index: usize,
    progress: &AtomicU32,
) -> RequestOutcome {
    let started = Instant::now();
    let max_attempts = policy.max_attempts();
    let mut attempt = 0;

    loop {
        attempt += 1;
        progress.store(attempt, Ordering::SeqCst);

        let reason = match client.post(request).await {
            Ok(response) if response.is_success() => {
                tracing::debug!(index, attempt, status = response.status, "Request succeeded");
                return RequestOutcome::success(index, response.status, response.body, attempt, started.elapsed());
            }
            Ok(response) => FailureReason::Status {
                status: response.status,
                body: response.body,
            },
            Err(err) => FailureReason::Transport(err),
        };

        if attempt >= max_attempts {
            tracing::warn!(index, attempts = attempt, reason = %reason, "Request failed, retries exhausted");
            return RequestOutcome::failure(index, reason, attempt, started.elapsed());
        }

        tracing::debug!(
            index,
            attempt,
            backoff_ms = policy.backoff.as_millis() as u64,
            reason = %reason,
            "Attempt failed, backing off"
        );

        if !policy.backoff.is_zero() {
            tokio::time::sleep(policy.backoff).await;
        }
    }
}
