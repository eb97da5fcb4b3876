//! Volley - fire POST requests, once or as a concurrent batch
//!
//! Every request runs as an independent pipeline with its own retry loop.
//! Pipelines never fail the batch: each ends as a success, a failure, or a
//! cancellation, and the batch comes back ordered by request index.

pub mod config;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod http;
pub mod retry;
pub mod summary;

pub use error::{Result, VolleyError};
