//! Sync orchestration: configuration, client wiring and the per-entity pipeline.

use std::collections::HashMap;
use std::time::Duration;

use adsync_adapters::queries::build_query;
use adsync_adapters::transform::build_records;
use adsync_adapters::{
    AdapterError, GoogleAdsClient, GoogleAdsCredentials, GoogleAdsEndpoints, ReportSource,
    DEFAULT_API_VERSION,
};
use adsync_core::{DateRange, Record, ReportKind, SyncRunCompletion, SyncRunStart, SyncStatus};
use adsync_storage::{
    HttpClient, HttpClientConfig, PgStore, PostgrestStore, RecordStore, RunLogId,
    StoreError,
};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

pub const CRATE_NAME: &str = "adsync-sync";

/// Records per upsert request.
pub const UPSERT_BATCH_SIZE: usize = 500;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;
const SUPABASE_URL_VARS: [&str; 3] = ["SUPABASE_URL", "VITE_SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
}

/// Where synced records land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    Postgrest { url: String, service_key: String },
    Postgres { database_url: String },
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub credentials: GoogleAdsCredentials,
    pub endpoints: GoogleAdsEndpoints,
    pub store: StoreTarget,
    pub http_timeout_secs: u64,
    pub user_agent: String,
}

impl SyncConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let credentials = GoogleAdsCredentials {
            developer_token: require("GOOGLE_ADS_DEVELOPER_TOKEN")?,
            client_id: require("GOOGLE_ADS_CLIENT_ID")?,
            client_secret: require("GOOGLE_ADS_CLIENT_SECRET")?,
            refresh_token: require("GOOGLE_ADS_REFRESH_TOKEN")?,
            customer_id: strip_dashes(&require("GOOGLE_ADS_CUSTOMER_ID")?),
            login_customer_id: get("GOOGLE_ADS_LOGIN_CUSTOMER_ID").map(|v| strip_dashes(&v)),
        };
        let endpoints = GoogleAdsEndpoints {
            api_version: get("GOOGLE_ADS_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            ..GoogleAdsEndpoints::default()
        };

        let store = match get("DATABASE_URL") {
            Some(database_url) => StoreTarget::Postgres { database_url },
            None => StoreTarget::Postgrest {
                url: SUPABASE_URL_VARS
                    .iter()
                    .find_map(|name| get(*name))
                    .ok_or(ConfigError::Missing("SUPABASE_URL"))?,
                service_key: require("SUPABASE_SERVICE_KEY")?,
            },
        };

        Ok(Self {
            credentials,
            endpoints,
            store,
            http_timeout_secs: get("ADSYNC_HTTP_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            user_agent: get("ADSYNC_USER_AGENT")
                .unwrap_or_else(|| concat!("adsync/", env!("CARGO_PKG_VERSION")).to_string()),
        })
    }

    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            timeout: Duration::from_secs(self.http_timeout_secs),
            user_agent: Some(self.user_agent.clone()),
            ..Default::default()
        }
    }
}

fn strip_dashes(value: &str) -> String {
    value.replace('-', "")
}

pub fn build_report_source(config: &SyncConfig, http: HttpClient) -> GoogleAdsClient {
    GoogleAdsClient::new(http, config.credentials.clone(), config.endpoints.clone())
}

pub async fn build_record_store(
    config: &SyncConfig,
    http: HttpClient,
) -> Result<Box<dyn RecordStore>, StoreError> {
    match &config.store {
        StoreTarget::Postgrest { url, service_key } => {
            Ok(Box::new(PostgrestStore::new(http, url.clone(), service_key)?))
        }
        StoreTarget::Postgres { database_url } => {
            Ok(Box::new(PgStore::connect(database_url).await?))
        }
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Source(#[from] AdapterError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityOutcome {
    pub entity: ReportKind,
    pub records: usize,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncRunSummary {
    pub run_id: Uuid,
    pub run_log_id: Option<RunLogId>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub range: DateRange,
    pub status: SyncStatus,
    pub records_synced: u64,
    pub entities: Vec<EntityOutcome>,
    /// `"{entity}: {error}"` per failed entity, in catalog order.
    pub errors: Vec<String>,
}

impl SyncRunSummary {
    pub fn is_success(&self) -> bool {
        self.status == SyncStatus::Success
    }

    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

/// Keeps the last record per `(id, date)`; survivors stay in input order.
pub fn dedupe_last_wins(records: Vec<Record>) -> Vec<Record> {
    let mut last_seen: HashMap<(String, String), usize> = HashMap::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        last_seen.insert((record.id().to_string(), record.date().to_string()), idx);
    }
    if last_seen.len() == records.len() {
        return records;
    }
    records
        .into_iter()
        .enumerate()
        .filter(|(idx, record)| {
            last_seen.get(&(record.id().to_string(), record.date().to_string())) == Some(idx)
        })
        .map(|(_, record)| record)
        .collect()
}

/// Upserts `records` in sequential chunks; the first failing chunk aborts.
pub async fn upsert_batches(
    store: &dyn RecordStore,
    table: &str,
    records: &[Record],
    batch_size: usize,
) -> Result<usize, StoreError> {
    let mut written = 0usize;
    for chunk in records.chunks(batch_size.max(1)) {
        written += store.upsert(table, chunk).await?;
    }
    Ok(written)
}

pub struct SyncPipeline {
    source: Box<dyn ReportSource>,
    store: Box<dyn RecordStore>,
    batch_size: usize,
}

impl SyncPipeline {
    pub fn new(source: Box<dyn ReportSource>, store: Box<dyn RecordStore>) -> Self {
        Self {
            source,
            store,
            batch_size: UPSERT_BATCH_SIZE,
        }
    }

    pub async fn from_config(config: &SyncConfig) -> Result<Self> {
        let http = HttpClient::new(config.http_client_config()).context("building http client")?;
        let source = build_report_source(config, http.clone());
        let store = build_record_store(config, http)
            .await
            .context("connecting record store")?;
        Ok(Self::new(Box::new(source), store))
    }

    /// Syncs every report kind for `range`; entity failures are collected, not raised.
    pub async fn run(&self, range: DateRange) -> SyncRunSummary {
        let run_id = Uuid::new_v4();
        let span = info_span!("sync_run", %run_id, %range, backend = self.store.backend());
        self.run_entities(run_id, range).instrument(span).await
    }

    async fn run_entities(&self, run_id: Uuid, range: DateRange) -> SyncRunSummary {
        let started_at = Utc::now();
        info!("syncing google ads reports");

        let run_log_id = match self.store.insert_run(&SyncRunStart::running(started_at)).await {
            Ok(id) => {
                info!(run_log_id = %id, "sync_log entry created");
                Some(id)
            }
            Err(err) => {
                warn!(error = %err, "could not create sync_log entry; continuing without it");
                None
            }
        };

        let mut entities = Vec::with_capacity(ReportKind::ALL.len());
        let mut errors = Vec::new();
        let mut records_synced = 0u64;

        for kind in ReportKind::ALL {
            let span = info_span!("sync_entity", %run_id, entity = %kind);
            match self.sync_entity(kind, &range).instrument(span).await {
                Ok(records) => {
                    records_synced += records as u64;
                    entities.push(EntityOutcome {
                        entity: kind,
                        records,
                        error: None,
                    });
                }
                Err(err) => {
                    error!(entity = %kind, error = %err, "entity sync failed");
                    errors.push(format!("{kind}: {err}"));
                    entities.push(EntityOutcome {
                        entity: kind,
                        records: 0,
                        error: Some(err.to_string()),
                    });
                }
            }
        }

        let finished_at = Utc::now();
        let completion = SyncRunCompletion::from_errors(finished_at, records_synced, &errors);
        if let Some(id) = &run_log_id {
            if let Err(err) = self.store.complete_run(id, &completion).await {
                warn!(run_log_id = %id, error = %err, "could not finalize sync_log entry");
            }
        }

        if errors.is_empty() {
            info!(
                records_synced,
                entities = entities.len(),
                "sync complete"
            );
        } else {
            error!(
                failed = errors.len(),
                errors = %errors.join("; "),
                "sync completed with errors"
            );
        }

        SyncRunSummary {
            run_id,
            run_log_id,
            started_at,
            finished_at,
            range,
            status: completion.status,
            records_synced,
            entities,
            errors,
        }
    }

    async fn sync_entity(&self, kind: ReportKind, range: &DateRange) -> Result<usize, SyncError> {
        let query = build_query(kind, range);
        info!("querying google ads");
        let rows = self.source.search(&query).await?;
        info!(rows = rows.len(), "api rows fetched");

        let records = build_records(kind, &rows, &*self.source).await?;
        let records = dedupe_last_wins(records);
        info!(records = records.len(), table = kind.table_name(), "upserting records");

        let written = upsert_batches(
            &*self.store,
            kind.table_name(),
            &records,
            self.batch_size,
        )
        .await?;
        info!(written, "entity synced");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adsync_adapters::GoogleAdsRow;
    use adsync_storage::FetchError;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    type SearchFn = dyn Fn(&str) -> Result<Vec<GoogleAdsRow>, AdapterError> + Send + Sync;

    struct FnSource(Box<SearchFn>);

    fn source<F>(search: F) -> FnSource
    where
        F: Fn(&str) -> Result<Vec<GoogleAdsRow>, AdapterError> + Send + Sync + 'static,
    {
        FnSource(Box::new(search))
    }

    #[async_trait]
    impl ReportSource for FnSource {
        async fn search(&self, query: &str) -> Result<Vec<GoogleAdsRow>, AdapterError> {
            (self.0)(query)
        }
    }

    #[derive(Clone, Default)]
    struct FakeStore {
        fail_insert: bool,
        fail_table: Option<&'static str>,
        upserts: Arc<Mutex<Vec<(String, usize)>>>,
        written: Arc<Mutex<Vec<(String, Record)>>>,
        completions: Arc<Mutex<Vec<(RunLogId, SyncRunCompletion)>>>,
    }

    #[async_trait]
    impl RecordStore for FakeStore {
        fn backend(&self) -> &'static str {
            "memory"
        }

        async fn insert_run(&self, _entry: &SyncRunStart) -> Result<RunLogId, StoreError> {
            if self.fail_insert {
                return Err(StoreError::MissingRunId);
            }
            Ok(RunLogId("7".into()))
        }

        async fn complete_run(
            &self,
            id: &RunLogId,
            completion: &SyncRunCompletion,
        ) -> Result<(), StoreError> {
            self.completions
                .lock()
                .unwrap()
                .push((id.clone(), completion.clone()));
            Ok(())
        }

        async fn upsert(&self, table: &str, records: &[Record]) -> Result<usize, StoreError> {
            if self.fail_table == Some(table) {
                return Err(StoreError::InvalidIdentifier(table.to_string()));
            }
            self.upserts
                .lock()
                .unwrap()
                .push((table.to_string(), records.len()));
            self.written
                .lock()
                .unwrap()
                .extend(records.iter().map(|r| (table.to_string(), r.clone())));
            Ok(records.len())
        }
    }

    fn sample_row() -> GoogleAdsRow {
        serde_json::from_value(json!({
            "campaign": {"id": "1", "name": "Dental-Brand-Exact", "status": "ENABLED"},
            "adGroup": {"id": "2", "name": "Plans"},
            "adGroupCriterion": {
                "criterionId": "3",
                "keyword": {"text": "dental plans", "matchType": "EXACT"},
                "qualityInfo": {"qualityScore": 7}
            },
            "adGroupAd": {"ad": {"id": "4"}},
            "metrics": {"costMicros": "5000000", "impressions": "20", "clicks": "2", "conversions": 1.0},
            "segments": {
                "date": "2026-02-17", "device": "MOBILE", "hour": 9, "dayOfWeek": "MONDAY",
                "conversionActionName": "Lead"
            },
            "searchTermView": {"searchTerm": "dental plans near me"},
            "landingPageView": {"unexpandedFinalUrl": "https://example.com/dental"}
        }))
        .unwrap()
    }

    fn quota_exhausted() -> AdapterError {
        AdapterError::Fetch(FetchError::HttpStatus {
            status: 429,
            url: "https://googleads.googleapis.com/v19/customers/1/googleAds:search".into(),
            body: "RESOURCE_EXHAUSTED".into(),
        })
    }

    /// One row in a US state region and one in a Canadian province.
    fn geo_rows() -> Vec<GoogleAdsRow> {
        [("geoTargetConstants/21137", "1"), ("geoTargetConstants/20121", "2")]
            .into_iter()
            .map(|(region, campaign)| {
                serde_json::from_value(json!({
                    "campaign": {"id": campaign},
                    "metrics": {"costMicros": "1000000", "impressions": "10", "clicks": "1"},
                    "segments": {"date": "2026-02-17", "geoTargetRegion": region},
                    "geographicView": {"countryCriterionId": "2840", "locationType": "AREA_OF_INTEREST"}
                }))
                .unwrap()
            })
            .collect()
    }

    fn geo_constant(id: &str, name: &str, canonical: &str, kind: &str, country: &str) -> GoogleAdsRow {
        serde_json::from_value(json!({
            "geoTargetConstant": {
                "id": id,
                "name": name,
                "canonicalName": canonical,
                "targetType": kind,
                "countryCode": country
            }
        }))
        .unwrap()
    }

    fn day() -> DateRange {
        DateRange::single(NaiveDate::from_ymd_opt(2026, 2, 17).unwrap())
    }

    #[tokio::test]
    async fn one_failing_entity_marks_run_as_error_and_others_still_sync() {
        let source = source(|query| {
            if query.contains("FROM ad_group_ad") {
                return Err(quota_exhausted());
            }
            // Duplicate rows collapse to one record per entity.
            Ok(vec![sample_row(), sample_row()])
        });
        let store = FakeStore::default();
        let pipeline = SyncPipeline::new(Box::new(source), Box::new(store.clone()));

        let summary = pipeline.run(day()).await;

        assert_eq!(summary.status, SyncStatus::Error);
        assert_eq!(summary.exit_code(), 1);
        assert_eq!(summary.records_synced, 10);
        assert_eq!(summary.errors, vec![format!("ads: {}", quota_exhausted())]);
        assert_eq!(summary.entities.len(), 11);
        assert_eq!(summary.run_log_id, Some(RunLogId("7".into())));

        let upserts = store.upserts.lock().unwrap();
        assert_eq!(upserts.len(), 10);
        assert!(upserts.iter().all(|(_, n)| *n == 1));
        assert!(!upserts.iter().any(|(table, _)| table == "ads"));
        assert_eq!(upserts[0].0, "campaigns");

        let completions = store.completions.lock().unwrap();
        assert_eq!(completions.len(), 1);
        let (id, completion) = &completions[0];
        assert_eq!(id, &RunLogId("7".into()));
        assert_eq!(completion.status, SyncStatus::Error);
        assert_eq!(completion.records_synced, 10);
        assert_eq!(
            completion.error_message,
            Some(format!("ads: {}", quota_exhausted()))
        );
    }

    #[tokio::test]
    async fn geo_records_are_enriched_before_upsert() {
        let source = source(|query| {
            if query.contains("FROM geo_target_constant") {
                return Ok(vec![
                    geo_constant("21137", "California", "California,United States", "State", "US"),
                    geo_constant("20121", "Ontario", "Ontario,Canada", "Province", "CA"),
                ]);
            }
            if query.contains("FROM geographic_view") {
                return Ok(geo_rows());
            }
            Ok(Vec::new())
        });
        let store = FakeStore::default();
        let summary = SyncPipeline::new(Box::new(source), Box::new(store.clone()))
            .run(day())
            .await;

        assert!(summary.is_success());
        assert_eq!(summary.records_synced, 2);

        let written = store.written.lock().unwrap();
        let geo = written
            .iter()
            .filter(|(table, _)| table == "geo_performance")
            .map(|(_, r)| {
                (
                    r.get("campaign_id").cloned(),
                    r.get("state").cloned(),
                    r.get("state_code").cloned(),
                    r.get("dma").cloned(),
                )
            })
            .collect::<Vec<_>>();
        assert_eq!(
            geo,
            vec![
                (
                    Some(json!("1")),
                    Some(json!("California")),
                    Some(json!("CA")),
                    Some(json!("State"))
                ),
                (
                    Some(json!("2")),
                    Some(json!("Ontario,Canada")),
                    Some(json!("20121")),
                    Some(json!("Province"))
                ),
            ]
        );
    }

    #[tokio::test]
    async fn failed_geo_lookup_fails_only_geo_performance() {
        let source = source(|query| {
            if query.contains("FROM geo_target_constant") {
                return Err(quota_exhausted());
            }
            if query.contains("FROM geographic_view") {
                return Ok(geo_rows());
            }
            Ok(vec![sample_row()])
        });
        let store = FakeStore::default();
        let summary = SyncPipeline::new(Box::new(source), Box::new(store.clone()))
            .run(day())
            .await;

        assert_eq!(summary.status, SyncStatus::Error);
        assert_eq!(
            summary.errors,
            vec![format!("geo_performance: {}", quota_exhausted())]
        );
        assert_eq!(summary.records_synced, 10);

        let upserts = store.upserts.lock().unwrap();
        assert_eq!(upserts.len(), 10);
        assert!(!upserts.iter().any(|(table, _)| table == "geo_performance"));
    }

    #[tokio::test]
    async fn store_failures_are_scoped_to_their_entity() {
        let source = source(|_| Ok(vec![sample_row()]));
        let store = FakeStore {
            fail_table: Some("keywords"),
            ..FakeStore::default()
        };
        let summary = SyncPipeline::new(Box::new(source), Box::new(store))
            .run(day())
            .await;

        assert_eq!(summary.records_synced, 10);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].starts_with("keywords: "));
    }

    #[tokio::test]
    async fn run_without_sync_log_entry_still_completes() {
        let source = source(|_| Ok(Vec::new()));
        let store = FakeStore {
            fail_insert: true,
            ..FakeStore::default()
        };
        let summary = SyncPipeline::new(Box::new(source), Box::new(store.clone()))
            .run(day())
            .await;

        assert!(summary.is_success());
        assert_eq!(summary.exit_code(), 0);
        assert_eq!(summary.records_synced, 0);
        assert!(summary.run_log_id.is_none());
        assert!(store.completions.lock().unwrap().is_empty());
        assert!(store.upserts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn upserts_are_chunked() {
        let store = FakeStore::default();
        let records = (0..1_201)
            .map(|n| Record::new(n.to_string(), "2026-02-17"))
            .collect::<Vec<_>>();

        let written = upsert_batches(&store, "campaigns", &records, UPSERT_BATCH_SIZE)
            .await
            .unwrap();

        assert_eq!(written, 1_201);
        let sizes = store
            .upserts
            .lock()
            .unwrap()
            .iter()
            .map(|(_, n)| *n)
            .collect::<Vec<_>>();
        assert_eq!(sizes, vec![500, 500, 201]);
    }

    #[test]
    fn dedupe_keeps_last_occurrence_in_order() {
        let records = vec![
            Record::new("a", "2026-02-17").with_field("spend", 1.0),
            Record::new("b", "2026-02-17").with_field("spend", 2.0),
            Record::new("a", "2026-02-17").with_field("spend", 3.0),
            Record::new("a", "2026-02-18").with_field("spend", 4.0),
        ];
        let deduped = dedupe_last_wins(records);
        let keys = deduped
            .iter()
            .map(|r| (r.id(), r.date(), r.get("spend").cloned()))
            .collect::<Vec<_>>();
        assert_eq!(
            keys,
            vec![
                ("b", "2026-02-17", Some(json!(2.0))),
                ("a", "2026-02-17", Some(json!(3.0))),
                ("a", "2026-02-18", Some(json!(4.0))),
            ]
        );
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |name| map.get(name).cloned()
    }

    const GOOGLE_VARS: [(&str, &str); 5] = [
        ("GOOGLE_ADS_DEVELOPER_TOKEN", "dev"),
        ("GOOGLE_ADS_CLIENT_ID", "cid"),
        ("GOOGLE_ADS_CLIENT_SECRET", "secret"),
        ("GOOGLE_ADS_REFRESH_TOKEN", "refresh"),
        ("GOOGLE_ADS_CUSTOMER_ID", "123-456-7890"),
    ];

    #[test]
    fn config_reads_google_and_supabase_settings() {
        let mut vars = GOOGLE_VARS.to_vec();
        vars.push(("NEXT_PUBLIC_SUPABASE_URL", "https://proj.supabase.co"));
        vars.push(("SUPABASE_SERVICE_KEY", "service"));
        vars.push(("GOOGLE_ADS_LOGIN_CUSTOMER_ID", "111-222-3333"));

        let config = SyncConfig::from_lookup(env(&vars)).unwrap();
        assert_eq!(config.credentials.customer_id, "1234567890");
        assert_eq!(config.credentials.login_customer_id.as_deref(), Some("1112223333"));
        assert_eq!(config.endpoints.api_version, "v19");
        assert_eq!(config.http_timeout_secs, 60);
        assert_eq!(
            config.store,
            StoreTarget::Postgrest {
                url: "https://proj.supabase.co".into(),
                service_key: "service".into()
            }
        );
    }

    #[test]
    fn database_url_selects_postgres_backend() {
        let mut vars = GOOGLE_VARS.to_vec();
        vars.push(("DATABASE_URL", "postgres://localhost/ads"));
        vars.push(("GOOGLE_ADS_API_VERSION", "v20"));
        vars.push(("ADSYNC_HTTP_TIMEOUT_SECS", "15"));

        let config = SyncConfig::from_lookup(env(&vars)).unwrap();
        assert!(matches!(config.store, StoreTarget::Postgres { .. }));
        assert_eq!(config.endpoints.api_version, "v20");
        assert_eq!(config.http_client_config().timeout, Duration::from_secs(15));
    }

    #[test]
    fn missing_required_settings_are_named() {
        let err = SyncConfig::from_lookup(env(&GOOGLE_VARS[..4])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("GOOGLE_ADS_CUSTOMER_ID"));

        let err = SyncConfig::from_lookup(env(&GOOGLE_VARS)).unwrap_err();
        assert_eq!(err, ConfigError::Missing("SUPABASE_URL"));

        let mut vars = GOOGLE_VARS.to_vec();
        vars.push(("SUPABASE_URL", "https://proj.supabase.co"));
        vars.push(("SUPABASE_SERVICE_KEY", "  "));
        let err = SyncConfig::from_lookup(env(&vars)).unwrap_err();
        assert_eq!(err, ConfigError::Missing("SUPABASE_SERVICE_KEY"));
    }
}
