//! Core domain model for adsync: report kinds, output records, run log types.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map as JsonMap, Value as JsonValue};
use sha2::{Digest, Sha256};
use thiserror::Error;

pub mod classify;
pub mod lookup;

pub use classify::SearchTermLabel;

pub const CRATE_NAME: &str = "adsync-core";

/// Report types pulled from Google Ads. Each one maps to a table of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Campaigns,
    Keywords,
    SearchTerms,
    Ads,
    GeoPerformance,
    DevicePerformance,
    HourlyPerformance,
    AuctionInsights,
    QualityScoreSnapshots,
    ConversionActions,
    LandingPages,
}

impl ReportKind {
    /// Catalog order used for logging and error aggregation.
    pub const ALL: [ReportKind; 11] = [
        ReportKind::Campaigns,
        ReportKind::Keywords,
        ReportKind::SearchTerms,
        ReportKind::Ads,
        ReportKind::GeoPerformance,
        ReportKind::DevicePerformance,
        ReportKind::HourlyPerformance,
        ReportKind::AuctionInsights,
        ReportKind::QualityScoreSnapshots,
        ReportKind::ConversionActions,
        ReportKind::LandingPages,
    ];

    pub fn table_name(self) -> &'static str {
        match self {
            ReportKind::Campaigns => "campaigns",
            ReportKind::Keywords => "keywords",
            ReportKind::SearchTerms => "search_terms",
            ReportKind::Ads => "ads",
            ReportKind::GeoPerformance => "geo_performance",
            ReportKind::DevicePerformance => "device_performance",
            ReportKind::HourlyPerformance => "hourly_performance",
            ReportKind::AuctionInsights => "auction_insights",
            ReportKind::QualityScoreSnapshots => "quality_score_snapshots",
            ReportKind::ConversionActions => "conversion_actions",
            ReportKind::LandingPages => "landing_pages",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// Google Ads money fields are in micros (1/1,000,000 of the account currency).
pub fn micros_to_units(micros: i64) -> f64 {
    micros as f64 / 1_000_000.0
}

/// Division that yields 0 instead of NaN/inf when the denominator is zero.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Deterministic 16-hex-char identifier for rows without a natural key.
pub fn stable_id<S: AsRef<str>>(parts: &[S]) -> String {
    let raw = parts
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join("|");
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(16);
    digest
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("date range start {from} is after end {to}")]
    Inverted { from: NaiveDate, to: NaiveDate },
}

/// Inclusive reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, DateRangeError> {
        if from > to {
            return Err(DateRangeError::Inverted { from, to });
        }
        Ok(Self { from, to })
    }

    pub fn single(day: NaiveDate) -> Self {
        Self { from: day, to: day }
    }

    /// The calendar day before `now`, in UTC.
    pub fn yesterday(now: DateTime<Utc>) -> Self {
        Self::single((now - Duration::days(1)).date_naive())
    }

    /// GAQL predicate over `segments.date`.
    pub fn gaql_condition(&self) -> String {
        let from = self.from.format("%Y-%m-%d");
        if self.from == self.to {
            format!("segments.date = '{from}'")
        } else {
            let to = self.to.format("%Y-%m-%d");
            format!("segments.date BETWEEN '{from}' AND '{to}'")
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.from, self.to)
    }
}

/// A typed output row for one report kind.
pub trait ReportRecord: Serialize {
    fn id(&self) -> &str;
    fn date(&self) -> &str;
}

/// Report record erased to a flat JSON object, ready for upsert.
///
/// The body always carries `id` and `date`; `(id, date)` is the storage key.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: String,
    date: String,
    body: JsonMap<String, JsonValue>,
}

impl Record {
    pub fn new(id: impl Into<String>, date: impl Into<String>) -> Self {
        let id = id.into();
        let date = date.into();
        let mut body = JsonMap::new();
        body.insert("id".to_string(), JsonValue::String(id.clone()));
        body.insert("date".to_string(), JsonValue::String(date.clone()));
        Self { id, date, body }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<JsonValue>) -> Self {
        if key != "id" && key != "date" {
            self.body.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn from_report<R: ReportRecord>(report: &R) -> Result<Self, serde_json::Error> {
        match serde_json::to_value(report)? {
            JsonValue::Object(body) => Ok(Self {
                id: report.id().to_string(),
                date: report.date().to_string(),
                body,
            }),
            other => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
                "report record serialized to a non-object: {other}"
            ))),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn key(&self) -> (&str, &str) {
        (&self.id, &self.date)
    }

    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.body.get(field)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.body.keys().map(String::as_str)
    }

    pub fn into_body(self) -> JsonMap<String, JsonValue> {
        self.body
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.body.serialize(serializer)
    }
}

pub fn erase_records<R: ReportRecord>(reports: &[R]) -> Result<Vec<Record>, serde_json::Error> {
    reports.iter().map(Record::from_report).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub id: String,
    pub date: String,
    pub campaign_name: String,
    pub product: String,
    pub intent_bucket: String,
    pub status: String,
    pub spend: f64,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: f64,
    pub conversion_value: f64,
    pub ctr: f64,
    pub cpc: f64,
    pub cpa: f64,
    pub roas: f64,
    pub conv_rate: f64,
    pub search_impression_share: f64,
    pub lost_is_budget: f64,
    pub lost_is_rank: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub id: String,
    pub date: String,
    pub keyword: String,
    pub match_type: String,
    pub campaign_id: String,
    pub campaign_name: String,
    pub ad_group_id: String,
    pub ad_group_name: String,
    /// Null when Google reports no score (0).
    pub quality_score: Option<i64>,
    pub expected_ctr: String,
    pub ad_relevance: String,
    pub landing_page_experience: String,
    pub spend: f64,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: f64,
    pub conversion_value: f64,
    pub ctr: f64,
    pub cpc: f64,
    pub cpa: f64,
    pub roas: f64,
    pub conv_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchTermRecord {
    pub id: String,
    pub date: String,
    pub search_term: String,
    pub campaign_id: String,
    pub campaign_name: String,
    pub ad_group_id: String,
    pub ad_group_name: String,
    pub match_type: String,
    pub label: SearchTermLabel,
    pub reason: String,
    pub spend: f64,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: f64,
    pub conversion_value: f64,
    pub cpa: f64,
    pub ctr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdRecord {
    pub id: String,
    pub date: String,
    pub campaign_id: String,
    pub campaign_name: String,
    pub ad_group_id: String,
    pub ad_group_name: String,
    pub headlines: Vec<String>,
    pub descriptions: Vec<String>,
    pub ad_strength: String,
    pub spend: f64,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: f64,
    pub conversion_value: f64,
    pub ctr: f64,
    pub cpc: f64,
    pub cpa: f64,
}

/// Geo row; `state`/`state_code` hold the raw criterion id until enriched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPerformanceRecord {
    pub id: String,
    pub date: String,
    pub campaign_id: String,
    pub state: String,
    pub state_code: String,
    pub dma: String,
    pub spend: f64,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: f64,
    pub conversion_value: f64,
    pub ctr: f64,
    pub cpc: f64,
    pub cpa: f64,
    pub roas: f64,
    pub conv_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevicePerformanceRecord {
    pub id: String,
    pub date: String,
    pub campaign_id: String,
    pub device: String,
    pub spend: f64,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: f64,
    pub conversion_value: f64,
    pub ctr: f64,
    pub cpc: f64,
    pub cpa: f64,
    pub roas: f64,
    pub conv_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPerformanceRecord {
    pub id: String,
    pub date: String,
    pub campaign_id: String,
    pub hour: i64,
    pub day_of_week: String,
    pub spend: f64,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: f64,
    pub conversion_value: f64,
}

/// Only the account's own share is reported; competitor columns stay null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionInsightRecord {
    pub id: String,
    pub date: String,
    pub campaign_id: String,
    pub competitor: String,
    pub impression_share: f64,
    pub overlap_rate: Option<f64>,
    pub position_above_rate: Option<f64>,
    pub top_of_page_rate: f64,
    pub outranking_share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScoreSnapshotRecord {
    pub id: String,
    pub date: String,
    pub keyword_id: String,
    pub keyword: String,
    pub campaign_id: String,
    pub product: String,
    pub quality_score: i64,
    pub expected_ctr: String,
    pub ad_relevance: String,
    pub landing_page_experience: String,
    pub spend: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionActionRecord {
    pub id: String,
    pub date: String,
    pub campaign_id: String,
    pub product: String,
    pub conversion_type: String,
    pub conversions: f64,
    pub conversion_value: f64,
    pub attribution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandingPageRecord {
    pub id: String,
    pub date: String,
    pub url: String,
    /// Approximated by clicks; Google Ads has no session count.
    pub sessions: i64,
    pub bounce_rate: Option<f64>,
    pub conversion_rate: f64,
    pub conversions: f64,
    pub conversion_value: f64,
    pub mobile_conv_rate: Option<f64>,
    pub desktop_conv_rate: Option<f64>,
}

macro_rules! impl_report_record {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ReportRecord for $ty {
                fn id(&self) -> &str {
                    &self.id
                }

                fn date(&self) -> &str {
                    &self.date
                }
            }
        )+
    };
}

impl_report_record!(
    CampaignRecord,
    KeywordRecord,
    SearchTermRecord,
    AdRecord,
    GeoPerformanceRecord,
    DevicePerformanceRecord,
    HourlyPerformanceRecord,
    AuctionInsightRecord,
    QualityScoreSnapshotRecord,
    ConversionActionRecord,
    LandingPageRecord,
);

/// Lifecycle of one sync invocation: `pending → running → {success, error}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Pending,
    Running,
    Success,
    Error,
}

impl SyncStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SyncStatus::Pending => "pending",
            SyncStatus::Running => "running",
            SyncStatus::Success => "success",
            SyncStatus::Error => "error",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SyncStatus::Success | SyncStatus::Error)
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `sync_log` row written when a run starts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncRunStart {
    pub started_at: DateTime<Utc>,
    pub status: SyncStatus,
    pub records_synced: u64,
    pub error_message: Option<String>,
}

impl SyncRunStart {
    pub fn running(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            status: SyncStatus::Running,
            records_synced: 0,
            error_message: None,
        }
    }
}

/// `sync_log` patch applied once the run finishes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncRunCompletion {
    pub completed_at: DateTime<Utc>,
    pub status: SyncStatus,
    pub records_synced: u64,
    pub error_message: Option<String>,
}

impl SyncRunCompletion {
    pub fn from_errors(completed_at: DateTime<Utc>, records_synced: u64, errors: &[String]) -> Self {
        let (status, error_message) = if errors.is_empty() {
            (SyncStatus::Success, None)
        } else {
            (SyncStatus::Error, Some(errors.join("; ")))
        };
        Self {
            completed_at,
            status,
            records_synced,
            error_message,
        }
    }
}
