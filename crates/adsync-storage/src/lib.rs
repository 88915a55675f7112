//! HTTP plumbing and record-store backends for adsync.

use std::fmt;
use std::time::Duration;

use adsync_core::{Record, SyncRunCompletion, SyncRunStart};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info_span, warn, Instrument};

mod pg;
mod postgrest;

pub use pg::{upsert_statement, PgStore};
pub use postgrest::PostgrestStore;

pub const CRATE_NAME: &str = "adsync-storage";

/// Longest slice of an error response body kept in error messages.
const ERROR_BODY_LIMIT: usize = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDisposition {
    Retryable,
    NonRetryable,
}

pub fn classify_status(status: StatusCode) -> RetryDisposition {
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        RetryDisposition::Retryable
    } else {
        RetryDisposition::NonRetryable
    }
}

pub fn classify_reqwest_error(err: &reqwest::Error) -> RetryDisposition {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        RetryDisposition::Retryable
    } else {
        RetryDisposition::NonRetryable
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    pub max_retries: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl BackoffPolicy {
    pub fn delay_for_attempt(&self, attempt_index: usize) -> Duration {
        let factor = 1u32.checked_shl(attempt_index as u32).unwrap_or(u32::MAX);
        let delay = self.base_delay.saturating_mul(factor);
        delay.min(self.max_delay)
    }
}

#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
    pub user_agent: Option<String>,
    pub backoff: BackoffPolicy,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            user_agent: None,
            backoff: BackoffPolicy::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status: StatusCode,
    pub final_url: String,
    pub body: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed after retries: {0}")]
    Request(#[from] reqwest::Error),
    #[error("http status {status} for {url}: {body}")]
    HttpStatus {
        status: u16,
        url: String,
        body: String,
    },
    #[error("decoding response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// reqwest client with retry/backoff for transient failures.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    backoff: BackoffPolicy,
}

impl HttpClient {
    pub fn new(config: HttpClientConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder()
            .gzip(true)
            .brotli(true)
            .timeout(config.timeout);

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        Ok(Self {
            client: builder.build()?,
            backoff: config.backoff,
        })
    }

    /// Sends the request produced by `build`, rebuilding it for each retry.
    pub async fn send<F>(&self, label: &str, build: F) -> Result<FetchedResponse, FetchError>
    where
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let span = info_span!("http_request", label);
        self.send_with_retry(build, self.backoff.max_retries)
            .instrument(span)
            .await
    }

    pub async fn send_json<T, F>(&self, label: &str, build: F) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        decode_json(self.send(label, build).await?)
    }

    /// Single attempt, no retries. For writes that must not be replayed.
    pub async fn send_json_once<T, F>(&self, label: &str, build: F) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let span = info_span!("http_request", label, retries = 0);
        decode_json(self.send_with_retry(build, 0).instrument(span).await?)
    }

    async fn send_with_retry<F>(
        &self,
        build: F,
        max_retries: usize,
    ) -> Result<FetchedResponse, FetchError>
    where
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let mut attempt = 0usize;
        loop {
            match build(&self.client).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    let final_url = resp.url().to_string();

                    if status.is_success() {
                        let body = resp.bytes().await?.to_vec();
                        debug!(%status, bytes = body.len(), "http response");
                        return Ok(FetchedResponse {
                            status,
                            final_url,
                            body,
                        });
                    }

                    if classify_status(status) == RetryDisposition::Retryable
                        && attempt < max_retries
                    {
                        let delay = self.backoff.delay_for_attempt(attempt);
                        warn!(%status, attempt, ?delay, "retryable http status");
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    let mut body = resp.text().await.unwrap_or_default();
                    truncate_on_char_boundary(&mut body, ERROR_BODY_LIMIT);
                    return Err(FetchError::HttpStatus {
                        status: status.as_u16(),
                        url: final_url,
                        body,
                    });
                }
                Err(err) => {
                    if classify_reqwest_error(&err) == RetryDisposition::Retryable
                        && attempt < max_retries
                    {
                        let delay = self.backoff.delay_for_attempt(attempt);
                        warn!(error = %err, attempt, ?delay, "retryable request error");
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(FetchError::Request(err));
                }
            }
        }
    }
}

fn decode_json<T: DeserializeOwned>(response: FetchedResponse) -> Result<T, FetchError> {
    serde_json::from_slice(&response.body).map_err(|source| FetchError::Decode {
        url: response.final_url,
        source,
    })
}

fn truncate_on_char_boundary(text: &mut String, limit: usize) {
    if text.len() <= limit {
        return;
    }
    let mut cut = limit;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
}

/// Server-assigned `sync_log` row identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RunLogId(pub String);

impl fmt::Display for RunLogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("encoding records: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("sync_log insert returned no id")]
    MissingRunId,
    #[error("invalid sql identifier {0:?}")]
    InvalidIdentifier(String),
    #[error("service key is not a valid http header value")]
    InvalidServiceKey,
    #[error("sync_log id {0:?} is not an integer")]
    InvalidRunId(String),
}

/// Destination for synced records and the run log.
#[async_trait]
pub trait RecordStore: Send + Sync {
    fn backend(&self) -> &'static str;

    async fn insert_run(&self, entry: &SyncRunStart) -> Result<RunLogId, StoreError>;

    async fn complete_run(
        &self,
        id: &RunLogId,
        completion: &SyncRunCompletion,
    ) -> Result<(), StoreError>;

    /// Inserts or updates one batch keyed on `(id, date)`; returns rows written.
    async fn upsert(&self, table: &str, records: &[Record]) -> Result<usize, StoreError>;
}
