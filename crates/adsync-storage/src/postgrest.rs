//! Supabase (PostgREST) backend.

use adsync_core::{Record, SyncRunCompletion, SyncRunStart};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value as JsonValue;

use crate::{HttpClient, RecordStore, RunLogId, StoreError};

const RUN_LOG_TABLE: &str = "sync_log";

#[derive(Debug, Clone)]
pub struct PostgrestStore {
    http: HttpClient,
    base_url: String,
    auth: HeaderMap,
}

impl PostgrestStore {
    pub fn new(
        http: HttpClient,
        base_url: impl Into<String>,
        service_key: &str,
    ) -> Result<Self, StoreError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let mut auth = HeaderMap::new();
        auth.insert(
            "apikey",
            HeaderValue::from_str(service_key).map_err(|_| StoreError::InvalidServiceKey)?,
        );
        auth.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {service_key}"))
                .map_err(|_| StoreError::InvalidServiceKey)?,
        );
        Ok(Self {
            http,
            base_url,
            auth,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_headers(&self, prefer: &'static str) -> HeaderMap {
        let mut headers = self.auth.clone();
        headers.insert("Prefer", HeaderValue::from_static(prefer));
        headers
    }
}

fn run_id_from_rows(rows: &JsonValue) -> Option<RunLogId> {
    match rows.get(0)?.get("id")? {
        JsonValue::String(id) => Some(RunLogId(id.clone())),
        JsonValue::Number(id) => Some(RunLogId(id.to_string())),
        _ => None,
    }
}

#[async_trait]
impl RecordStore for PostgrestStore {
    fn backend(&self) -> &'static str {
        "postgrest"
    }

    async fn insert_run(&self, entry: &SyncRunStart) -> Result<RunLogId, StoreError> {
        let url = self.table_url(RUN_LOG_TABLE);
        let headers = self.auth_headers("return=representation");
        // Not retried: a replayed insert would leave a second `running` row.
        let rows: JsonValue = self
            .http
            .send_json_once("sync_log.insert", |client| {
                client.post(&url).headers(headers.clone()).json(entry)
            })
            .await?;
        run_id_from_rows(&rows).ok_or(StoreError::MissingRunId)
    }

    async fn complete_run(
        &self,
        id: &RunLogId,
        completion: &SyncRunCompletion,
    ) -> Result<(), StoreError> {
        let url = self.table_url(RUN_LOG_TABLE);
        let headers = self.auth_headers("return=minimal");
        let filter = format!("eq.{id}");
        self.http
            .send("sync_log.update", |client| {
                client
                    .patch(&url)
                    .query(&[("id", filter.as_str())])
                    .headers(headers.clone())
                    .json(completion)
            })
            .await?;
        Ok(())
    }

    async fn upsert(&self, table: &str, records: &[Record]) -> Result<usize, StoreError> {
        if records.is_empty() {
            return Ok(0);
        }
        let url = self.table_url(table);
        let headers = self.auth_headers("resolution=merge-duplicates,return=minimal");
        self.http
            .send(table, |client| {
                client
                    .post(&url)
                    .query(&[("on_conflict", "id,date")])
                    .headers(headers.clone())
                    .json(records)
            })
            .await?;
        Ok(records.len())
    }
}
