//! GAQL report templates; `{date_condition}` is filled in per run.

use adsync_core::{DateRange, ReportKind};

const DATE_PLACEHOLDER: &str = "{date_condition}";

const CAMPAIGNS: &str = "
    SELECT
        campaign.id, campaign.name, campaign.status,
        metrics.cost_micros, metrics.impressions, metrics.clicks,
        metrics.conversions, metrics.conversions_value,
        metrics.ctr, metrics.average_cpc,
        metrics.search_impression_share,
        metrics.search_budget_lost_impression_share,
        metrics.search_rank_lost_impression_share,
        segments.date
    FROM campaign
    WHERE {date_condition}
        AND campaign.advertising_channel_type = 'SEARCH'
";

const KEYWORDS: &str = "
    SELECT
        ad_group_criterion.criterion_id,
        ad_group_criterion.keyword.text,
        ad_group_criterion.keyword.match_type,
        campaign.id, campaign.name,
        ad_group.id, ad_group.name,
        ad_group_criterion.quality_info.quality_score,
        ad_group_criterion.quality_info.search_predicted_ctr,
        ad_group_criterion.quality_info.creative_quality_score,
        ad_group_criterion.quality_info.post_click_quality_score,
        metrics.cost_micros, metrics.impressions, metrics.clicks,
        metrics.conversions, metrics.conversions_value,
        metrics.ctr, metrics.average_cpc,
        segments.date
    FROM keyword_view
    WHERE {date_condition}
        AND campaign.advertising_channel_type = 'SEARCH'
";

const SEARCH_TERMS: &str = "
    SELECT
        search_term_view.search_term,
        campaign.id, campaign.name,
        ad_group.id, ad_group.name,
        segments.keyword.info.match_type,
        metrics.cost_micros, metrics.impressions, metrics.clicks,
        metrics.conversions, metrics.conversions_value, metrics.ctr,
        segments.date
    FROM search_term_view
    WHERE {date_condition}
        AND campaign.advertising_channel_type = 'SEARCH'
        AND metrics.cost_micros > 0
";

const ADS: &str = "
    SELECT
        ad_group_ad.ad.id,
        campaign.id, campaign.name,
        ad_group.id, ad_group.name,
        ad_group_ad.ad.responsive_search_ad.headlines,
        ad_group_ad.ad.responsive_search_ad.descriptions,
        ad_group_ad.ad_strength,
        metrics.cost_micros, metrics.impressions, metrics.clicks,
        metrics.conversions, metrics.conversions_value,
        metrics.ctr, metrics.average_cpc,
        segments.date
    FROM ad_group_ad
    WHERE {date_condition}
        AND campaign.advertising_channel_type = 'SEARCH'
        AND ad_group_ad.ad.type = 'RESPONSIVE_SEARCH_AD'
";

const GEO_PERFORMANCE: &str = "
    SELECT
        campaign.id,
        campaign.advertising_channel_type,
        segments.geo_target_region,
        geographic_view.country_criterion_id,
        geographic_view.location_type,
        metrics.cost_micros, metrics.impressions, metrics.clicks,
        metrics.conversions, metrics.conversions_value,
        metrics.ctr, metrics.average_cpc,
        segments.date
    FROM geographic_view
    WHERE {date_condition}
        AND campaign.advertising_channel_type = 'SEARCH'
        AND metrics.cost_micros > 0
";

const DEVICE_PERFORMANCE: &str = "
    SELECT
        campaign.id, segments.device,
        metrics.cost_micros, metrics.impressions, metrics.clicks,
        metrics.conversions, metrics.conversions_value,
        metrics.ctr, metrics.average_cpc,
        segments.date
    FROM campaign
    WHERE {date_condition}
        AND campaign.advertising_channel_type = 'SEARCH'
";

const HOURLY_PERFORMANCE: &str = "
    SELECT
        campaign.id,
        segments.hour, segments.day_of_week,
        metrics.cost_micros, metrics.impressions, metrics.clicks,
        metrics.conversions, metrics.conversions_value,
        segments.date
    FROM campaign
    WHERE {date_condition}
        AND campaign.advertising_channel_type = 'SEARCH'
        AND metrics.cost_micros > 0
";

// Competitor-level auction data is not exposed through GAQL; only the
// campaign's own share metrics are pulled here.
const AUCTION_INSIGHTS: &str = "
    SELECT
        campaign.id, campaign.name,
        metrics.search_impression_share,
        metrics.search_top_impression_share,
        metrics.search_absolute_top_impression_share,
        segments.date
    FROM campaign
    WHERE {date_condition}
        AND campaign.advertising_channel_type = 'SEARCH'
        AND metrics.impressions > 0
";

const QUALITY_SCORE_SNAPSHOTS: &str = "
    SELECT
        ad_group_criterion.criterion_id,
        ad_group_criterion.keyword.text,
        campaign.id, campaign.name,
        ad_group_criterion.quality_info.quality_score,
        ad_group_criterion.quality_info.search_predicted_ctr,
        ad_group_criterion.quality_info.creative_quality_score,
        ad_group_criterion.quality_info.post_click_quality_score,
        metrics.cost_micros,
        segments.date
    FROM keyword_view
    WHERE {date_condition}
        AND campaign.advertising_channel_type = 'SEARCH'
        AND ad_group_criterion.quality_info.quality_score IS NOT NULL
";

const CONVERSION_ACTIONS: &str = "
    SELECT
        campaign.id, campaign.name,
        segments.conversion_action_name,
        segments.conversion_action_category,
        metrics.conversions, metrics.conversions_value,
        segments.date
    FROM campaign
    WHERE {date_condition}
        AND campaign.advertising_channel_type = 'SEARCH'
        AND metrics.conversions > 0
";

const LANDING_PAGES: &str = "
    SELECT
        campaign.advertising_channel_type,
        landing_page_view.unexpanded_final_url,
        metrics.clicks, metrics.impressions,
        metrics.conversions, metrics.conversions_value,
        metrics.cost_micros,
        segments.date
    FROM landing_page_view
    WHERE {date_condition}
        AND campaign.advertising_channel_type = 'SEARCH'
        AND metrics.cost_micros > 0
";

pub fn template(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Campaigns => CAMPAIGNS,
        ReportKind::Keywords => KEYWORDS,
        ReportKind::SearchTerms => SEARCH_TERMS,
        ReportKind::Ads => ADS,
        ReportKind::GeoPerformance => GEO_PERFORMANCE,
        ReportKind::DevicePerformance => DEVICE_PERFORMANCE,
        ReportKind::HourlyPerformance => HOURLY_PERFORMANCE,
        ReportKind::AuctionInsights => AUCTION_INSIGHTS,
        ReportKind::QualityScoreSnapshots => QUALITY_SCORE_SNAPSHOTS,
        ReportKind::ConversionActions => CONVERSION_ACTIONS,
        ReportKind::LandingPages => LANDING_PAGES,
    }
}

pub fn build_query(kind: ReportKind, range: &DateRange) -> String {
    template(kind).replace(DATE_PLACEHOLDER, &range.gaql_condition())
}

/// Reference lookup for a chunk of geo target criterion ids.
pub fn geo_target_query(criterion_ids: &[String]) -> String {
    format!(
        "
    SELECT
        geo_target_constant.id,
        geo_target_constant.name,
        geo_target_constant.canonical_name,
        geo_target_constant.target_type,
        geo_target_constant.country_code
    FROM geo_target_constant
    WHERE geo_target_constant.id IN ({})
",
        criterion_ids.join(", ")
    )
}
