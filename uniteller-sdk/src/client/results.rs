//! Results endpoint client (merchant backend → Uniteller).

use std::time::Duration;

use reqwest::Client;
use url::Url;

use super::ClientError;
use crate::config::ProviderSettings;
use crate::objects::{StatusQuery, parse_status_response};

/// Request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Attempts made for one lookup when none is configured.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

const BASE_RETRY_DELAY: Duration = Duration::from_millis(250);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(4);

/// Backoff before retry number `attempt` (0-based): `250ms * 2^attempt`,
/// capped at four seconds.
pub fn retry_delay(attempt: u32) -> Duration {
    BASE_RETRY_DELAY
        .saturating_mul(2u32.saturating_pow(attempt))
        .min(MAX_RETRY_DELAY)
}

/// Typed HTTP client for the Uniteller **results** endpoint.
#[derive(Debug, Clone)]
pub struct ResultsClient {
    http: Client,
    results_url: Url,
    max_attempts: u32,
}

impl ResultsClient {
    /// Create a client whose requests time out after `timeout`.
    pub fn new(results_url: Url, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            results_url,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// Set how many attempts a lookup makes before giving up (at least one).
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Fetch the statuses Uniteller reports for `order_id`.
    ///
    /// Transient failures (timeouts, connection errors, 5xx) are retried
    /// with [`retry_delay`] backoff up to the configured attempt count.
    pub async fn fetch_statuses(
        &self,
        settings: &ProviderSettings,
        order_id: &str,
    ) -> Result<Vec<String>, ClientError> {
        let query = StatusQuery::new(settings, order_id);
        let mut attempt = 0;
        loop {
            match self.fetch_once(&query).await {
                Ok(body) => return Ok(parse_status_response(&body)?),
                Err(e) if e.is_transient() && attempt + 1 < self.max_attempts => {
                    let delay = retry_delay(attempt);
                    tracing::warn!(
                        order_id,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Uniteller status lookup failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, query: &StatusQuery) -> Result<String, ClientError> {
        let resp = self
            .http
            .post(self.results_url.clone())
            .form(query)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api { status, body });
        }
        Ok(resp.text().await?)
    }
}
