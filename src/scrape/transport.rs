//! HTTP transport for the live pipeline. One session is built per batch
//! and injected into the pipeline, so tests can substitute canned pages.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::warn;

use crate::error::ScrapeError;

// The portal is a slow government server; read generously, connect fast.
const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 60;
const POOL_IDLE_TIMEOUT_SECS: u64 = 60;

#[async_trait(?Send)]
pub trait Transport {
    /// Fetch one page. A non-2xx status yields an empty string — the
    /// "no data" sentinel callers must treat as "skip this unit of
    /// work". Only transport-level failures are errors.
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<String, ScrapeError>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .pool_idle_timeout(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait(?Send)]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| ScrapeError::Transport { url: url.to_string(), source })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "upstream returned non-success status, treating as empty");
            return Ok(String::new());
        }

        response
            .text()
            .await
            .map_err(|source| ScrapeError::Transport { url: url.to_string(), source })
    }
}
