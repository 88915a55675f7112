//! `GoogleAdsRow` as returned by the REST search endpoint.
//!
//! Resources are camelCase objects; int64 values arrive as JSON strings and
//! default-valued fields are omitted entirely, so every field is defaulted and
//! numeric fields accept either encoding.

use adsync_core::lookup::{CampaignStatus, DayOfWeek, Device, EnumName, MatchType, QualityRating};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Int(i64),
    Float(f64),
    Text(String),
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Option::<RawScalar>::deserialize(deserializer)? {
        None => Ok(0),
        Some(RawScalar::Int(v)) => Ok(v),
        Some(RawScalar::Float(v)) => Ok(v.trunc() as i64),
        Some(RawScalar::Text(s)) if s.is_empty() => Ok(0),
        Some(RawScalar::Text(s)) => s.parse::<i64>().or_else(|_| {
            s.parse::<f64>()
                .map(|v| v.trunc() as i64)
                .map_err(D::Error::custom)
        }),
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Option::<RawScalar>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(RawScalar::Int(v)) => Ok(v as f64),
        Some(RawScalar::Float(v)) => Ok(v),
        Some(RawScalar::Text(s)) if s.is_empty() => Ok(0.0),
        Some(RawScalar::Text(s)) => s.parse::<f64>().map_err(D::Error::custom),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Option::<RawScalar>::deserialize(deserializer)? {
        None => Ok(String::new()),
        Some(RawScalar::Int(v)) => Ok(v.to_string()),
        Some(RawScalar::Float(v)) => Ok(v.to_string()),
        Some(RawScalar::Text(s)) => Ok(s),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GoogleAdsRow {
    pub campaign: Campaign,
    pub ad_group: AdGroup,
    pub ad_group_criterion: AdGroupCriterion,
    pub ad_group_ad: AdGroupAd,
    pub metrics: Metrics,
    pub segments: Segments,
    pub search_term_view: SearchTermView,
    pub geographic_view: GeographicView,
    pub landing_page_view: LandingPageView,
    pub geo_target_constant: GeoTargetConstant,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Campaign {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    pub name: String,
    pub status: CampaignStatus,
    pub advertising_channel_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdGroup {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdGroupCriterion {
    #[serde(deserialize_with = "lenient_string")]
    pub criterion_id: String,
    pub keyword: KeywordInfo,
    pub quality_info: QualityInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeywordInfo {
    pub text: String,
    pub match_type: MatchType,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QualityInfo {
    #[serde(deserialize_with = "lenient_i64")]
    pub quality_score: i64,
    pub search_predicted_ctr: QualityRating,
    pub creative_quality_score: QualityRating,
    pub post_click_quality_score: QualityRating,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdGroupAd {
    pub ad: Ad,
    pub ad_strength: EnumName,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Ad {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    pub responsive_search_ad: ResponsiveSearchAdInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResponsiveSearchAdInfo {
    pub headlines: Vec<AdTextAsset>,
    pub descriptions: Vec<AdTextAsset>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdTextAsset {
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Metrics {
    #[serde(deserialize_with = "lenient_i64")]
    pub cost_micros: i64,
    #[serde(deserialize_with = "lenient_i64")]
    pub impressions: i64,
    #[serde(deserialize_with = "lenient_i64")]
    pub clicks: i64,
    #[serde(deserialize_with = "lenient_f64")]
    pub conversions: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub conversions_value: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub ctr: f64,
    /// Micros; fractional micros are dropped.
    #[serde(deserialize_with = "lenient_i64")]
    pub average_cpc: i64,
    #[serde(deserialize_with = "lenient_f64")]
    pub search_impression_share: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub search_budget_lost_impression_share: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub search_rank_lost_impression_share: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub search_top_impression_share: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub search_absolute_top_impression_share: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Segments {
    pub date: String,
    pub device: Device,
    #[serde(deserialize_with = "lenient_i64")]
    pub hour: i64,
    pub day_of_week: DayOfWeek,
    /// Resource name, e.g. `geoTargetConstants/21137`.
    pub geo_target_region: String,
    pub keyword: SegmentKeyword,
    pub conversion_action_name: String,
    pub conversion_action_category: EnumName,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SegmentKeyword {
    pub info: KeywordInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchTermView {
    pub search_term: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeographicView {
    #[serde(deserialize_with = "lenient_string")]
    pub country_criterion_id: String,
    pub location_type: EnumName,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LandingPageView {
    pub unexpanded_final_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeoTargetConstant {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    pub name: String,
    pub canonical_name: String,
    pub target_type: String,
    pub country_code: String,
}
