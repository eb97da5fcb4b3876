//! Scripted HTTP client for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::http::client::{HttpClient, HttpResponse, PostRequest, TransportError};

/// What a single mock call returns
pub type MockReply = Result<HttpResponse, TransportError>;

/// Mock HTTP client.
///
/// Replies are taken from a FIFO script. Once the script runs dry every call
/// gets the fallback reply (200 "ok" unless changed). Calls are counted and
/// the number of simultaneous calls is tracked, so tests can check both retry
/// counts and fan-out.
///
/// # Example
/// ```ignore
/// let mock = MockHttpClient::new();
/// mock.push_response(503, "busy");
/// mock.push_error(TransportError::Connect("refused".into()));
/// // third call onward gets 200 "ok"
/// ```
#[derive(Clone)]
pub struct MockHttpClient {
    script: Arc<Mutex<VecDeque<MockReply>>>,
    fallback: Arc<Mutex<MockReply>>,
    latency: Duration,
    calls: Arc<Mutex<Vec<PostRequest>>>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            fallback: Arc::new(Mutex::new(Ok(HttpResponse::new(200, "ok")))),
            latency: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Mock whose every call fails with the given status
    pub fn always_status(status: u16) -> Self {
        let mock = Self::new();
        mock.set_fallback(Ok(HttpResponse::new(status, "")));
        mock
    }

    /// Mock whose every call fails at the transport level
    pub fn always_error(error: TransportError) -> Self {
        let mock = Self::new();
        mock.set_fallback(Err(error));
        mock
    }

    /// Delay every call by `latency` before replying
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Queue a reply
    pub fn push(&self, reply: MockReply) {
        self.script.lock().unwrap().push_back(reply);
    }

    /// Queue a response with the given status
    pub fn push_response(&self, status: u16, body: &str) {
        self.push(Ok(HttpResponse::new(status, body)));
    }

    /// Queue a transport error
    pub fn push_error(&self, error: TransportError) {
        self.push(Err(error));
    }

    /// Reply used once the script is empty
    pub fn set_fallback(&self, reply: MockReply) {
        *self.fallback.lock().unwrap() = reply;
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Requests received, in arrival order
    pub fn calls(&self) -> Vec<PostRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls currently waiting on their latency
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of calls observed in flight at once
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn next_reply(&self) -> MockReply {
        let scripted = self.script.lock().unwrap().pop_front();
        match scripted {
            Some(reply) => reply,
            None => self.fallback.lock().unwrap().clone(),
        }
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn post(&self, request: &PostRequest) -> Result<HttpResponse, TransportError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlightGuard {
            in_flight: self.in_flight.clone(),
        };

        self.calls.lock().unwrap().push(request.clone());
        let reply = self.next_reply();

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        reply
    }
}

/// Decrements the in-flight counter even when the call is aborted.
struct InFlightGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
