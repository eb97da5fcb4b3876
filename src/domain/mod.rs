//! Domain types for Volley
//!
//! - RequestOutcome: terminal result of one pipeline (Success, Failure, Cancelled)
//! - BatchResult: outcomes of a dispatch, ordered by request index

pub mod batch;
pub mod outcome;

pub use batch::BatchResult;
pub use outcome::{FailureReason, OutcomeStatus, RequestOutcome};
