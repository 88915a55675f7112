//! Raw Google Ads rows → typed report records.

use adsync_core::classify::{classify_search_term, infer_intent_bucket, infer_product, median};
use adsync_core::{
    erase_records, micros_to_units, safe_div, stable_id, AdRecord, AuctionInsightRecord,
    CampaignRecord, ConversionActionRecord, DevicePerformanceRecord, GeoPerformanceRecord,
    HourlyPerformanceRecord, KeywordRecord, LandingPageRecord, QualityScoreSnapshotRecord, Record,
    ReportKind, ReportRecord, SearchTermRecord,
};

use crate::geo::GeoEnricher;
use crate::rows::{GoogleAdsRow, Metrics};
use crate::{AdapterError, ReportSource};

/// Metrics shared by most report types, with zero-safe ratios.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Performance {
    spend: f64,
    impressions: i64,
    clicks: i64,
    conversions: f64,
    conversion_value: f64,
    ctr: f64,
    cpc: f64,
    cpa: f64,
    roas: f64,
    conv_rate: f64,
}

impl Performance {
    fn from_metrics(metrics: &Metrics) -> Self {
        let spend = micros_to_units(metrics.cost_micros);
        let conversions = metrics.conversions;
        let conversion_value = metrics.conversions_value;
        let clicks = metrics.clicks;
        Self {
            spend,
            impressions: metrics.impressions,
            clicks,
            conversions,
            conversion_value,
            ctr: metrics.ctr,
            cpc: micros_to_units(metrics.average_cpc),
            cpa: safe_div(spend, conversions),
            roas: safe_div(conversion_value, spend),
            conv_rate: safe_div(conversions, clicks as f64),
        }
    }
}

pub fn campaigns(rows: &[GoogleAdsRow]) -> Vec<CampaignRecord> {
    rows.iter()
        .map(|r| {
            let p = Performance::from_metrics(&r.metrics);
            CampaignRecord {
                id: r.campaign.id.clone(),
                date: r.segments.date.clone(),
                campaign_name: r.campaign.name.clone(),
                product: infer_product(&r.campaign.name).to_string(),
                intent_bucket: infer_intent_bucket(&r.campaign.name).to_string(),
                status: r.campaign.status.label().to_string(),
                spend: p.spend,
                impressions: p.impressions,
                clicks: p.clicks,
                conversions: p.conversions,
                conversion_value: p.conversion_value,
                ctr: p.ctr,
                cpc: p.cpc,
                cpa: p.cpa,
                roas: p.roas,
                conv_rate: p.conv_rate,
                search_impression_share: r.metrics.search_impression_share,
                lost_is_budget: r.metrics.search_budget_lost_impression_share,
                lost_is_rank: r.metrics.search_rank_lost_impression_share,
            }
        })
        .collect()
}

pub fn keywords(rows: &[GoogleAdsRow]) -> Vec<KeywordRecord> {
    rows.iter()
        .map(|r| {
            let p = Performance::from_metrics(&r.metrics);
            let criterion = &r.ad_group_criterion;
            let quality = &criterion.quality_info;
            KeywordRecord {
                id: criterion.criterion_id.clone(),
                date: r.segments.date.clone(),
                keyword: criterion.keyword.text.clone(),
                match_type: criterion.keyword.match_type.label().to_string(),
                campaign_id: r.campaign.id.clone(),
                campaign_name: r.campaign.name.clone(),
                ad_group_id: r.ad_group.id.clone(),
                ad_group_name: r.ad_group.name.clone(),
                quality_score: (quality.quality_score != 0).then_some(quality.quality_score),
                expected_ctr: quality.search_predicted_ctr.label().to_string(),
                ad_relevance: quality.creative_quality_score.label().to_string(),
                landing_page_experience: quality.post_click_quality_score.label().to_string(),
                spend: p.spend,
                impressions: p.impressions,
                clicks: p.clicks,
                conversions: p.conversions,
                conversion_value: p.conversion_value,
                ctr: p.ctr,
                cpc: p.cpc,
                cpa: p.cpa,
                roas: p.roas,
                conv_rate: p.conv_rate,
            }
        })
        .collect()
}

/// Two passes: the win/loss label needs the batch median CPA first.
pub fn search_terms(rows: &[GoogleAdsRow]) -> Vec<SearchTermRecord> {
    let base = rows
        .iter()
        .map(|r| (Performance::from_metrics(&r.metrics), r))
        .collect::<Vec<_>>();

    let cpas = base
        .iter()
        .filter(|(p, _)| p.conversions > 0.0 && p.cpa > 0.0)
        .map(|(p, _)| p.cpa)
        .collect::<Vec<_>>();
    let median_cpa = median(&cpas);

    base.into_iter()
        .filter(|(_, r)| !r.search_term_view.search_term.is_empty())
        .map(|(p, r)| {
            let term = &r.search_term_view.search_term;
            let match_type = &r.segments.keyword.info.match_type;
            let verdict = classify_search_term(p.spend, p.conversions, p.cpa, median_cpa);
            SearchTermRecord {
                id: stable_id(&[
                    r.campaign.id.as_str(),
                    r.ad_group.id.as_str(),
                    term.as_str(),
                    match_type.api_name(),
                ]),
                date: r.segments.date.clone(),
                search_term: term.clone(),
                campaign_id: r.campaign.id.clone(),
                campaign_name: r.campaign.name.clone(),
                ad_group_id: r.ad_group.id.clone(),
                ad_group_name: r.ad_group.name.clone(),
                match_type: match_type.label().to_string(),
                label: verdict.label,
                reason: verdict.reason,
                spend: p.spend,
                impressions: p.impressions,
                clicks: p.clicks,
                conversions: p.conversions,
                conversion_value: p.conversion_value,
                cpa: p.cpa,
                ctr: p.ctr,
            }
        })
        .collect()
}

pub fn ads(rows: &[GoogleAdsRow]) -> Vec<AdRecord> {
    rows.iter()
        .map(|r| {
            let p = Performance::from_metrics(&r.metrics);
            let rsa = &r.ad_group_ad.ad.responsive_search_ad;
            AdRecord {
                id: r.ad_group_ad.ad.id.clone(),
                date: r.segments.date.clone(),
                campaign_id: r.campaign.id.clone(),
                campaign_name: r.campaign.name.clone(),
                ad_group_id: r.ad_group.id.clone(),
                ad_group_name: r.ad_group.name.clone(),
                headlines: rsa.headlines.iter().map(|a| a.text.clone()).collect(),
                descriptions: rsa.descriptions.iter().map(|a| a.text.clone()).collect(),
                ad_strength: r.ad_group_ad.ad_strength.clone().into(),
                spend: p.spend,
                impressions: p.impressions,
                clicks: p.clicks,
                conversions: p.conversions,
                conversion_value: p.conversion_value,
                ctr: p.ctr,
                cpc: p.cpc,
                cpa: p.cpa,
            }
        })
        .collect()
}

/// Region criterion id from `geoTargetConstants/<id>`, else the country id.
fn geo_criterion_id(row: &GoogleAdsRow) -> String {
    let region = row.segments.geo_target_region.as_str();
    if region.is_empty() {
        row.geographic_view.country_criterion_id.clone()
    } else {
        region.rsplit('/').next().unwrap_or(region).to_string()
    }
}

/// `state`/`state_code` carry the raw criterion id until [`GeoEnricher`] runs.
pub fn geo_performance(rows: &[GoogleAdsRow]) -> Vec<GeoPerformanceRecord> {
    rows.iter()
        .map(|r| {
            let p = Performance::from_metrics(&r.metrics);
            let criterion_id = geo_criterion_id(r);
            let key_part = if criterion_id.is_empty() {
                "unknown"
            } else {
                criterion_id.as_str()
            };
            GeoPerformanceRecord {
                id: stable_id(&[r.campaign.id.as_str(), key_part]),
                date: r.segments.date.clone(),
                campaign_id: r.campaign.id.clone(),
                state: criterion_id.clone(),
                state_code: criterion_id,
                dma: r.geographic_view.location_type.clone().into(),
                spend: p.spend,
                impressions: p.impressions,
                clicks: p.clicks,
                conversions: p.conversions,
                conversion_value: p.conversion_value,
                ctr: p.ctr,
                cpc: p.cpc,
                cpa: p.cpa,
                roas: p.roas,
                conv_rate: p.conv_rate,
            }
        })
        .collect()
}

pub fn device_performance(rows: &[GoogleAdsRow]) -> Vec<DevicePerformanceRecord> {
    rows.iter()
        .map(|r| {
            let p = Performance::from_metrics(&r.metrics);
            let device = r.segments.device.label();
            DevicePerformanceRecord {
                id: stable_id(&[r.campaign.id.as_str(), device]),
                date: r.segments.date.clone(),
                campaign_id: r.campaign.id.clone(),
                device: device.to_string(),
                spend: p.spend,
                impressions: p.impressions,
                clicks: p.clicks,
                conversions: p.conversions,
                conversion_value: p.conversion_value,
                ctr: p.ctr,
                cpc: p.cpc,
                cpa: p.cpa,
                roas: p.roas,
                conv_rate: p.conv_rate,
            }
        })
        .collect()
}

pub fn hourly_performance(rows: &[GoogleAdsRow]) -> Vec<HourlyPerformanceRecord> {
    rows.iter()
        .map(|r| {
            let hour = r.segments.hour;
            let day = r.segments.day_of_week.label();
            HourlyPerformanceRecord {
                id: stable_id(&[r.campaign.id.as_str(), hour.to_string().as_str(), day]),
                date: r.segments.date.clone(),
                campaign_id: r.campaign.id.clone(),
                hour,
                day_of_week: day.to_string(),
                spend: micros_to_units(r.metrics.cost_micros),
                impressions: r.metrics.impressions,
                clicks: r.metrics.clicks,
                conversions: r.metrics.conversions,
                conversion_value: r.metrics.conversions_value,
            }
        })
        .collect()
}

pub fn auction_insights(rows: &[GoogleAdsRow]) -> Vec<AuctionInsightRecord> {
    rows.iter()
        .map(|r| AuctionInsightRecord {
            id: stable_id(&[r.campaign.id.as_str(), "self"]),
            date: r.segments.date.clone(),
            campaign_id: r.campaign.id.clone(),
            competitor: "You".to_string(),
            impression_share: r.metrics.search_impression_share,
            overlap_rate: None,
            position_above_rate: None,
            top_of_page_rate: r.metrics.search_top_impression_share,
            outranking_share: r.metrics.search_absolute_top_impression_share,
        })
        .collect()
}

pub fn quality_score_snapshots(rows: &[GoogleAdsRow]) -> Vec<QualityScoreSnapshotRecord> {
    rows.iter()
        .map(|r| {
            let criterion = &r.ad_group_criterion;
            let quality = &criterion.quality_info;
            QualityScoreSnapshotRecord {
                id: criterion.criterion_id.clone(),
                date: r.segments.date.clone(),
                keyword_id: criterion.criterion_id.clone(),
                keyword: criterion.keyword.text.clone(),
                campaign_id: r.campaign.id.clone(),
                product: infer_product(&r.campaign.name).to_string(),
                quality_score: quality.quality_score,
                expected_ctr: quality.search_predicted_ctr.label().to_string(),
                ad_relevance: quality.creative_quality_score.label().to_string(),
                landing_page_experience: quality.post_click_quality_score.label().to_string(),
                spend: micros_to_units(r.metrics.cost_micros),
            }
        })
        .collect()
}

pub fn conversion_actions(rows: &[GoogleAdsRow]) -> Vec<ConversionActionRecord> {
    rows.iter()
        .map(|r| {
            let conversion_type = &r.segments.conversion_action_name;
            ConversionActionRecord {
                id: stable_id(&[r.campaign.id.as_str(), conversion_type.as_str()]),
                date: r.segments.date.clone(),
                campaign_id: r.campaign.id.clone(),
                product: infer_product(&r.campaign.name).to_string(),
                conversion_type: conversion_type.clone(),
                conversions: r.metrics.conversions,
                conversion_value: r.metrics.conversions_value,
                attribution: r.segments.conversion_action_category.clone().into(),
            }
        })
        .collect()
}

pub fn landing_pages(rows: &[GoogleAdsRow]) -> Vec<LandingPageRecord> {
    rows.iter()
        .filter(|r| !r.landing_page_view.unexpanded_final_url.is_empty())
        .map(|r| {
            let url = &r.landing_page_view.unexpanded_final_url;
            let clicks = r.metrics.clicks;
            let conversions = r.metrics.conversions;
            LandingPageRecord {
                id: stable_id(&[url.as_str()]),
                date: r.segments.date.clone(),
                url: url.clone(),
                sessions: clicks,
                bounce_rate: None,
                conversion_rate: safe_div(conversions, clicks as f64),
                conversions,
                conversion_value: r.metrics.conversions_value,
                mobile_conv_rate: None,
                desktop_conv_rate: None,
            }
        })
        .collect()
}

fn erase<R: ReportRecord>(kind: ReportKind, reports: &[R]) -> Result<Vec<Record>, AdapterError> {
    erase_records(reports).map_err(|source| AdapterError::Transform { kind, source })
}

/// Transforms one report's rows, running geo enrichment where it applies.
pub async fn build_records(
    kind: ReportKind,
    rows: &[GoogleAdsRow],
    source: &dyn ReportSource,
) -> Result<Vec<Record>, AdapterError> {
    match kind {
        ReportKind::Campaigns => erase(kind, &campaigns(rows)),
        ReportKind::Keywords => erase(kind, &keywords(rows)),
        ReportKind::SearchTerms => erase(kind, &search_terms(rows)),
        ReportKind::Ads => erase(kind, &ads(rows)),
        ReportKind::GeoPerformance => {
            let mut records = geo_performance(rows);
            GeoEnricher::new(source).enrich(&mut records).await?;
            erase(kind, &records)
        }
        ReportKind::DevicePerformance => erase(kind, &device_performance(rows)),
        ReportKind::HourlyPerformance => erase(kind, &hourly_performance(rows)),
        ReportKind::AuctionInsights => erase(kind, &auction_insights(rows)),
        ReportKind::QualityScoreSnapshots => erase(kind, &quality_score_snapshots(rows)),
        ReportKind::ConversionActions => erase(kind, &conversion_actions(rows)),
        ReportKind::LandingPages => erase(kind, &landing_pages(rows)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adsync_core::SearchTermLabel;
    use serde_json::json;

    fn row(value: serde_json::Value) -> GoogleAdsRow {
        serde_json::from_value(value).expect("row json")
    }

    #[test]
    fn campaign_metrics_and_labels() {
        let rows = vec![row(json!({
            "campaign": {"id": "11", "name": "Term Life Leads Q1 leadgen", "status": "REMOVED"},
            "metrics": {
                "costMicros": "200000000", "impressions": "1000", "clicks": "40",
                "conversions": 4.0, "conversionsValue": 800.0, "ctr": 0.04,
                "averageCpc": "5000000", "searchImpressionShare": 0.6
            },
            "segments": {"date": "2026-02-17"}
        }))];

        let out = campaigns(&rows);
        let c = &out[0];
        assert_eq!(c.id, "11");
        assert_eq!(c.product, "Term Life");
        assert_eq!(c.intent_bucket, "Nonbrand Lead Gen");
        assert_eq!(c.status, "ended");
        assert_eq!(c.spend, 200.0);
        assert_eq!(c.cpc, 5.0);
        assert_eq!(c.cpa, 50.0);
        assert_eq!(c.roas, 4.0);
        assert_eq!(c.conv_rate, 0.1);
        assert_eq!(c.lost_is_budget, 0.0);
    }

    #[test]
    fn zero_denominators_yield_zero_ratios() {
        let rows = vec![row(json!({
            "campaign": {"id": "7"},
            "metrics": {"conversionsValue": 12.0},
            "segments": {"date": "2026-02-17", "device": "SMART_TV"}
        }))];
        let d = &device_performance(&rows)[0];
        assert_eq!(d.device, "Other");
        assert_eq!(d.cpa, 0.0);
        assert_eq!(d.roas, 0.0);
        assert_eq!(d.conv_rate, 0.0);
        assert_eq!(d.id, stable_id(&["7", "Other"]));
    }

    #[test]
    fn keyword_quality_score_zero_becomes_null() {
        let rows = vec![
            row(json!({
                "adGroupCriterion": {
                    "criterionId": "501",
                    "keyword": {"text": "dental plans", "matchType": "EXACT"},
                    "qualityInfo": {"qualityScore": 7, "searchPredictedCtr": "ABOVE_AVERAGE"}
                },
                "segments": {"date": "2026-02-17"}
            })),
            row(json!({
                "adGroupCriterion": {"criterionId": "502", "keyword": {"text": "x"}},
                "segments": {"date": "2026-02-17"}
            })),
        ];
        let out = keywords(&rows);
        assert_eq!(out[0].quality_score, Some(7));
        assert_eq!(out[0].match_type, "Exact");
        assert_eq!(out[0].expected_ctr, "Above Average");
        assert_eq!(out[0].ad_relevance, "");
        assert_eq!(out[1].quality_score, None);
        assert_eq!(out[1].match_type, "Broad");

        let snapshots = quality_score_snapshots(&rows);
        assert_eq!(snapshots[1].quality_score, 0);
        assert_eq!(snapshots[0].keyword_id, "501");
    }

    fn term_row(term: &str, cost_micros: i64, conversions: f64) -> GoogleAdsRow {
        row(json!({
            "searchTermView": {"searchTerm": term},
            "campaign": {"id": "1", "name": "Dental"},
            "adGroup": {"id": "2", "name": "Plans"},
            "metrics": {"costMicros": cost_micros.to_string(), "conversions": conversions},
            "segments": {"date": "2026-02-17", "keyword": {"info": {"matchType": "PHRASE"}}}
        }))
    }

    #[test]
    fn search_terms_classify_against_batch_median() {
        // CPAs 10, 30, 50 -> median 30, winner threshold 24.
        let rows = vec![
            term_row("cheap dental", 10_000_000, 1.0),
            term_row("dental plans", 60_000_000, 2.0),
            term_row("dental insurance", 100_000_000, 2.0),
            term_row("free teeth", 150_000_000, 0.0),
            term_row("", 500_000_000, 0.0),
        ];
        let out = search_terms(&rows);
        assert_eq!(out.len(), 4, "empty term is skipped");
        assert_eq!(out[0].label, SearchTermLabel::Winner);
        assert_eq!(out[1].label, SearchTermLabel::Neutral);
        assert_eq!(out[2].label, SearchTermLabel::Neutral);
        assert_eq!(out[3].label, SearchTermLabel::Loser);
        assert_eq!(out[3].reason, "Spent $150.00 with 0 conversions.");
        assert_eq!(out[0].match_type, "Phrase");
        assert_eq!(out[0].id, stable_id(&["1", "2", "cheap dental", "PHRASE"]));
    }

    #[test]
    fn geo_rows_keep_raw_criterion_placeholder() {
        let rows = vec![
            row(json!({
                "campaign": {"id": "9"},
                "segments": {"date": "2026-02-17", "geoTargetRegion": "geoTargetConstants/21137"},
                "geographicView": {"countryCriterionId": "2840", "locationType": "AREA_OF_INTEREST"}
            })),
            row(json!({
                "campaign": {"id": "9"},
                "segments": {"date": "2026-02-17"},
                "geographicView": {"countryCriterionId": "2124"}
            })),
            row(json!({"campaign": {"id": "9"}, "segments": {"date": "2026-02-17"}})),
        ];
        let out = geo_performance(&rows);
        assert_eq!(out[0].state, "21137");
        assert_eq!(out[0].state_code, "21137");
        assert_eq!(out[0].dma, "AREA_OF_INTEREST");
        assert_eq!(out[0].id, stable_id(&["9", "21137"]));
        assert_eq!(out[1].state_code, "2124");
        assert_eq!(out[2].id, stable_id(&["9", "unknown"]));
    }

    #[test]
    fn hourly_ids_use_day_label() {
        let rows = vec![row(json!({
            "campaign": {"id": "3"},
            "segments": {"date": "2026-02-17", "hour": 9, "dayOfWeek": "TUESDAY"}
        }))];
        let h = &hourly_performance(&rows)[0];
        assert_eq!(h.day_of_week, "Tuesday");
        assert_eq!(h.id, stable_id(&["3", "9", "Tuesday"]));
    }

    #[test]
    fn auction_insights_report_only_self() {
        let rows = vec![row(json!({
            "campaign": {"id": "123"},
            "metrics": {"searchImpressionShare": 0.42, "searchTopImpressionShare": 0.3},
            "segments": {"date": "2026-02-17"}
        }))];
        let a = &auction_insights(&rows)[0];
        assert_eq!(a.id, "5be00953ec163074");
        assert_eq!(a.competitor, "You");
        assert_eq!(a.overlap_rate, None);
        assert_eq!(a.top_of_page_rate, 0.3);
    }

    #[test]
    fn landing_pages_skip_empty_urls() {
        let rows = vec![
            row(json!({
                "landingPageView": {"unexpandedFinalUrl": "https://example.com/quote"},
                "metrics": {"clicks": "20", "conversions": 5.0},
                "segments": {"date": "2026-02-17"}
            })),
            row(json!({"segments": {"date": "2026-02-17"}})),
        ];
        let out = landing_pages(&rows);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "5c22286fba7ab09c");
        assert_eq!(out[0].sessions, 20);
        assert_eq!(out[0].conversion_rate, 0.25);
        assert_eq!(out[0].bounce_rate, None);
    }

    #[test]
    fn ads_collect_asset_texts() {
        let rows = vec![row(json!({
            "adGroupAd": {
                "ad": {"id": "77", "responsiveSearchAd": {
                    "headlines": [{"text": "Dental Plans"}, {"text": "Save Today"}],
                    "descriptions": [{"text": "Compare plans."}]
                }},
                "adStrength": "GOOD"
            },
            "segments": {"date": "2026-02-17"}
        }))];
        let ad = &ads(&rows)[0];
        assert_eq!(ad.headlines, vec!["Dental Plans", "Save Today"]);
        assert_eq!(ad.descriptions, vec!["Compare plans."]);
        assert_eq!(ad.ad_strength, "GOOD");
    }

    #[test]
    fn missing_provider_enums_read_as_unspecified() {
        let rows = vec![row(json!({
            "campaign": {"id": "5", "name": "Annuities Retirement"},
            "adGroupAd": {"ad": {"id": "78"}},
            "segments": {"date": "2026-02-17", "conversionActionName": "Call"},
            "geographicView": {"countryCriterionId": "2840"}
        }))];
        assert_eq!(ads(&rows)[0].ad_strength, "UNSPECIFIED");
        assert_eq!(conversion_actions(&rows)[0].attribution, "UNSPECIFIED");
        assert_eq!(geo_performance(&rows)[0].dma, "UNSPECIFIED");
    }

    #[test]
    fn conversion_actions_keep_category() {
        let rows = vec![row(json!({
            "campaign": {"id": "5", "name": "Annuities Retirement"},
            "segments": {"date": "2026-02-17", "conversionActionName": "Quote Form", "conversionActionCategory": "SUBMIT_LEAD_FORM"},
            "metrics": {"conversions": 3.0}
        }))];
        let c = &conversion_actions(&rows)[0];
        assert_eq!(c.product, "Annuities");
        assert_eq!(c.attribution, "SUBMIT_LEAD_FORM");
        assert_eq!(c.id, stable_id(&["5", "Quote Form"]));
    }
}
