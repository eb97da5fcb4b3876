//! Production HTTP client backed by reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::http::client::{HttpClient, HttpResponse, PostRequest, TransportError};

/// Default per-request timeout
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Settings for the production client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// One reqwest client, and therefore one connection pool, shared by every pipeline.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    #[tracing::instrument(skip(self, request), fields(url = %request.url))]
    async fn post(&self, request: &PostRequest) -> std::result::Result<HttpResponse, TransportError> {
        let mut req = self.client.post(&request.url);

        if !request.body.is_empty() {
            req = req
                .header("content-type", "application/json")
                .body(request.body.clone());
        }

        let response = req.send().await.map_err(|e| {
            tracing::debug!(error = %e, "POST did not get a response");
            TransportError::from(e)
        })?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(status = status, response_len = body.len(), "POST completed");

        Ok(HttpResponse { status, body })
    }
}
