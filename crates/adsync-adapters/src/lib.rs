//! Google Ads report source: REST client, GAQL catalog, row transformers.

use std::time::Duration;

use adsync_core::ReportKind;
use adsync_storage::{FetchError, HttpClient};
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

pub mod geo;
pub mod queries;
mod rows;
pub mod transform;

pub use geo::{GeoEnricher, GeoTarget, GEO_LOOKUP_CHUNK_SIZE};
pub use rows::*;

pub const CRATE_NAME: &str = "adsync-adapters";

pub const DEFAULT_API_BASE: &str = "https://googleads.googleapis.com";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_API_VERSION: &str = "v19";

/// Access tokens are refreshed this long before Google says they expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("oauth token exchange failed: {0}")]
    Auth(String),
    #[error("encoding {kind} records: {source}")]
    Transform {
        kind: ReportKind,
        #[source]
        source: serde_json::Error,
    },
}

/// Executes GAQL and returns every row across all result pages.
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<GoogleAdsRow>, AdapterError>;
}

#[derive(Debug, Clone)]
pub struct GoogleAdsCredentials {
    pub developer_token: String,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    /// Digits only.
    pub customer_id: String,
    pub login_customer_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GoogleAdsEndpoints {
    pub api_base: String,
    pub token_url: String,
    pub api_version: String,
}

impl Default for GoogleAdsEndpoints {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SearchPage {
    results: Vec<GoogleAdsRow>,
    next_page_token: Option<String>,
}

#[derive(Debug)]
struct CachedToken {
    access_token: String,
    refresh_at: Instant,
}

/// Google Ads REST client with a refresh-token OAuth flow.
pub struct GoogleAdsClient {
    http: HttpClient,
    credentials: GoogleAdsCredentials,
    endpoints: GoogleAdsEndpoints,
    token: Mutex<Option<CachedToken>>,
}

impl GoogleAdsClient {
    pub fn new(
        http: HttpClient,
        credentials: GoogleAdsCredentials,
        endpoints: GoogleAdsEndpoints,
    ) -> Self {
        Self {
            http,
            credentials,
            endpoints,
            token: Mutex::new(None),
        }
    }

    fn search_url(&self) -> String {
        format!(
            "{}/{}/customers/{}/googleAds:search",
            self.endpoints.api_base.trim_end_matches('/'),
            self.endpoints.api_version,
            self.credentials.customer_id
        )
    }

    async fn access_token(&self) -> Result<String, AdapterError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.access_token.clone());
            }
        }

        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("refresh_token", self.credentials.refresh_token.as_str()),
        ];
        let response: TokenResponse = self
            .http
            .send_json("oauth.token", |client| {
                client.post(&self.endpoints.token_url).form(&form)
            })
            .await?;
        if response.access_token.is_empty() {
            return Err(AdapterError::Auth(
                "token response carried no access_token".to_string(),
            ));
        }

        let lifetime = Duration::from_secs(response.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        debug!(expires_in = response.expires_in, "refreshed google ads access token");
        *cached = Some(CachedToken {
            access_token: response.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });
        Ok(response.access_token)
    }
}

#[async_trait]
impl ReportSource for GoogleAdsClient {
    async fn search(&self, query: &str) -> Result<Vec<GoogleAdsRow>, AdapterError> {
        let url = self.search_url();
        let mut rows = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let access_token = self.access_token().await?;
            let mut body = serde_json::json!({ "query": query });
            if let Some(token) = &page_token {
                body["pageToken"] = serde_json::Value::String(token.clone());
            }

            let page: SearchPage = self
                .http
                .send_json("google_ads.search", |client| {
                    let mut request = client
                        .post(&url)
                        .bearer_auth(&access_token)
                        .header("developer-token", &self.credentials.developer_token)
                        .json(&body);
                    if let Some(login) = &self.credentials.login_customer_id {
                        request = request.header("login-customer-id", login);
                    }
                    request
                })
                .await?;

            pages += 1;
            rows.extend(page.results);
            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        info!(pages, rows = rows.len(), "google ads search complete");
        Ok(rows)
    }
}
