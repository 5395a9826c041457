use crate::data_sync::config::GraphSyncConfig;
use crate::data_sync::query::GraphQuery;
use crate::errors::TransportError;
use crate::utils::constants::LOG_TRUNCATE_LEN;
use crate::utils::truncate_chars;
use async_trait::async_trait;
use rand::Rng;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// POST a query to the graph and return the parsed JSON body.
///
/// Implementations own their retry/backoff policy for transport failures;
/// a returned error means the request is not worth repeating.
#[async_trait]
pub trait GraphTransport: Send + Sync {
    async fn post_with_retry(&self, url: &str, payload: &GraphQuery) -> Result<Value, TransportError>;
}

/// reqwest-backed transport with exponential backoff on 429, 5xx, connect and
/// timeout failures.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: reqwest::Client,
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl HttpTransport {
    pub fn new(config: &GraphSyncConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder().default_headers(headers).timeout(config.http_timeout()).build()?;

        Ok(Self {
            http_client,
            max_attempts: config.http_max_attempts.max(1),
            base_delay: config.http_base_delay(),
            max_delay: config.http_max_delay(),
        })
    }

    /// Backoff before retry number `attempt` (1-based): base * 2^(attempt-1),
    /// capped at `max_delay`, plus up to half the base delay of jitter.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let base_ms = u64::try_from(self.base_delay.as_millis()).unwrap_or(u64::MAX);
        let max_ms = u64::try_from(self.max_delay.as_millis()).unwrap_or(u64::MAX);
        let delay_ms = base_ms.saturating_mul(2_u64.saturating_pow(attempt.saturating_sub(1))).min(max_ms);
        let jitter_ms = if base_ms > 1 { rand::thread_rng().gen_range(0..=base_ms / 2) } else { 0 };
        Duration::from_millis(delay_ms.saturating_add(jitter_ms))
    }

    async fn send_once(&self, url: &str, payload: &GraphQuery) -> Result<Value, TransportError> {
        let response = self.http_client.post(url).json(payload).send().await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes);
            return Err(TransportError::HttpStatus { status, body: truncate_chars(&body, LOG_TRUNCATE_LEN).to_string() });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl GraphTransport for HttpTransport {
    async fn post_with_retry(&self, url: &str, payload: &GraphQuery) -> Result<Value, TransportError> {
        let mut attempt = 1;
        loop {
            match self.send_once(url, payload).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.backoff_delay(attempt);
                    debug!("Graph request attempt {} of {} failed ({}), retrying after {:?}", attempt, self.max_attempts, err, delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
