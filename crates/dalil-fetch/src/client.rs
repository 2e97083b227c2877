//! HTTP client for the directory endpoint.
//!
//! The endpoint is a single parameterless GET returning
//! `{ "shops": [...] }`, or `{ "data": [...] }` on some deployments.
//! Each attempt is bounded by its own deadline and a failed attempt is
//! retried sequentially after a fixed delay.

use std::time::Duration;

use dalil_core::{AppConfig, RawEntry};
use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::FetchError;
use crate::retry::retry_with_delay;

const DEFAULT_MAX_RETRIES: u32 = 1;
const DEFAULT_RETRY_DELAY_MS: u64 = 1_500;

/// Client for the remote directory endpoint.
///
/// Use [`DirectoryClient::new`] with an explicit endpoint (a wiremock
/// server in tests) or [`DirectoryClient::from_config`] in the CLI.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    client: Client,
    endpoint: Url,
    timeout: Duration,
    max_retries: u32,
    retry_delay_ms: u64,
}

impl DirectoryClient {
    /// Creates a client with the default retry policy (one retry after 1.5 s).
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if `endpoint` does not parse, or
    /// [`FetchError::Rejected`] if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn new(endpoint: &str, timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let endpoint = Url::parse(endpoint).map_err(|e| FetchError::InvalidUrl {
            url: endpoint.to_owned(),
            reason: e.to_string(),
        })?;
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            timeout,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        })
    }

    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Same as [`DirectoryClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        Ok(Self::new(
            &config.endpoint_url,
            Duration::from_secs(config.fetch_timeout_secs),
            &config.user_agent,
        )?
        .with_retry(config.fetch_max_retries, config.fetch_retry_delay_ms))
    }

    /// Overrides the retry policy. `max_retries = 0` disables retrying.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, retry_delay_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.retry_delay_ms = retry_delay_ms;
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetches the full dataset, retrying transient failures.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Timeout`] if the last attempt exceeded its deadline.
    /// - [`FetchError::Rejected`] on network failure.
    /// - [`FetchError::BadStatus`] on a non-2xx response.
    /// - [`FetchError::Malformed`] if the last body lacked an entry array.
    pub async fn fetch_entries(&self) -> Result<Vec<RawEntry>, FetchError> {
        retry_with_delay(self.max_retries, self.retry_delay_ms, || self.fetch_once()).await
    }

    /// A single attempt, cancelled when the deadline passes.
    async fn fetch_once(&self) -> Result<Vec<RawEntry>, FetchError> {
        match tokio::time::timeout(self.timeout, self.request()).await {
            Ok(result) => result,
            Err(_) => Err(self.timeout_error()),
        }
    }

    async fn request(&self) -> Result<Vec<RawEntry>, FetchError> {
        let url = self.endpoint.as_str();
        let response = self
            .client
            .get(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        let entries = parse_payload(&body).map_err(|reason| FetchError::Malformed {
            url: url.to_owned(),
            reason,
        })?;
        tracing::debug!(url, count = entries.len(), "directory fetched");
        Ok(entries)
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            self.timeout_error()
        } else {
            FetchError::Rejected(err)
        }
    }

    fn timeout_error(&self) -> FetchError {
        FetchError::Timeout {
            url: self.endpoint.to_string(),
            elapsed: self.timeout,
        }
    }
}

/// Extracts the entry array from a response body.
///
/// Records that are not JSON objects are skipped; the rest are parsed
/// leniently by [`RawEntry`].
fn parse_payload(body: &str) -> Result<Vec<RawEntry>, String> {
    let value: Value = serde_json::from_str(body).map_err(|e| format!("invalid JSON: {e}"))?;
    let items = ["shops", "data"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_array))
        .ok_or_else(|| "expected a `shops` or `data` array".to_string())?;

    let total = items.len();
    let entries: Vec<RawEntry> = items
        .iter()
        .filter(|item| item.is_object())
        .filter_map(|item| serde_json::from_value::<RawEntry>(item.clone()).ok())
        .collect();
    if entries.len() < total {
        tracing::debug!(
            skipped = total - entries.len(),
            "skipped non-object directory records"
        );
    }
    Ok(entries)
}
