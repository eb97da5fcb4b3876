//! Retry layer: the policy and the loop that applies it to a single request.

pub mod executor;
pub mod policy;

pub use executor::{execute_tracked, execute_with_retry};
pub use policy::{DEFAULT_BACKOFF, DEFAULT_MAX_RETRIES, RetryPolicy};
