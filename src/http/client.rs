//! HTTP transport seam.
//!
//! The dispatcher never talks to reqwest directly. It goes through the
//! `HttpClient` trait so pipelines can share one pooled client in production
//! and a scripted client in tests.

use async_trait::async_trait;
use thiserror::Error;

/// A POST to send. Shared immutably by every pipeline in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRequest {
    pub url: String,
    /// Empty means no body is attached.
    pub body: String,
}

impl PostRequest {
    /// Create a POST with an empty body
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: String::new(),
        }
    }

    /// Attach a body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// A response that made it back over the wire, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx only. Redirects count as failures.
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Failure to obtain any response at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Failed to read response body: {0}")]
    Body(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            TransportError::Timeout(message)
        } else if err.is_connect() {
            TransportError::Connect(message)
        } else if err.is_body() || err.is_decode() {
            TransportError::Body(message)
        } else {
            TransportError::Request(message)
        }
    }
}

/// Executes POST requests.
///
/// Implementations are shared across concurrently running pipelines, so they
/// must be safe for concurrent use.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send one POST. Any received response is `Ok`, including 4xx/5xx.
    async fn post(&self, request: &PostRequest) -> Result<HttpResponse, TransportError>;
}
