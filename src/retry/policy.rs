//! Retry policy: how many extra attempts a pipeline gets and how long it waits between them.

use std::time::Duration;

/// Retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Pause between attempts
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(50);

/// Fixed for the lifetime of a dispatch call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self { max_retries, backoff }
    }

    /// Single attempt, no backoff
    pub fn no_retry() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Upper bound on attempts: the first one plus every retry
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_BACKOFF)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.backoff, Duration::from_millis(50));
        assert_eq!(policy.max_attempts(), 3);
    }

    #[test]
    fn test_no_retry() {
        let policy = RetryPolicy::no_retry();
        assert_eq!(policy.max_attempts(), 1);
        assert!(policy.backoff.is_zero());
    }

    #[test]
    fn test_max_attempts_saturates() {
        let policy = RetryPolicy::new(u32::MAX, Duration::ZERO);
        assert_eq!(policy.max_attempts(), u32::MAX);
    }
}
