//! Campaign-name and search-term classification heuristics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered product rules; first match wins.
const PRODUCT_RULES: [(&str, &[&str]); 5] = [
    (
        "Term Life",
        &["termlife", "term life", "term-life", "life insurance"],
    ),
    ("Dental Network", &["dental"]),
    ("Disability", &["disability", "idi"]),
    (
        "Annuities",
        &["annuity", "annuities", "rila", "retirement"],
    ),
    (
        "Join Our Network",
        &["recruit", "credential", "join", "provider"],
    ),
];

const NONBRAND_MARKERS: &[&str] = &["nonbrand", "non-brand", "nonbranded", "non-branded"];
const GROUP_MARKERS: &[&str] = &["group", "employer", "worksite", "abm-"];
const LEAD_GEN_MARKERS: &[&str] = &["leadgen", "conversion", "quote", "quotes"];

/// Share of the batch median CPA a converting term must beat to be a winner.
const WINNER_CPA_FACTOR: f64 = 0.8;
/// Spend above which a non-converting term is a loser.
const LOSER_SPEND_THRESHOLD: f64 = 100.0;

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

/// Infers the insurance product line from a campaign name.
pub fn infer_product(text: &str) -> &'static str {
    let text = text.to_lowercase();
    PRODUCT_RULES
        .iter()
        .find(|(_, keywords)| contains_any(&text, keywords))
        .map(|(product, _)| *product)
        .unwrap_or("Other")
}

/// Infers the funnel bucket from a campaign name.
///
/// Precedence: brand, then group, then lead gen; everything else is
/// midfunnel. A `-brand-` marker does not count when the name also says
/// non-brand.
pub fn infer_intent_bucket(text: &str) -> &'static str {
    let text = text.to_lowercase();
    if text.contains("google_brand") {
        return "Brand";
    }
    let negated = contains_any(&text, NONBRAND_MARKERS);
    if !negated && (text.contains("-brand-") || text.contains("-branded")) {
        return "Brand";
    }
    if contains_any(&text, GROUP_MARKERS) {
        return "Group";
    }
    if contains_any(&text, LEAD_GEN_MARKERS) {
        return "Nonbrand Lead Gen";
    }
    "Education/Midfunnel"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchTermLabel {
    Winner,
    Loser,
    Neutral,
}

impl SearchTermLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchTermLabel::Winner => "winner",
            SearchTermLabel::Loser => "loser",
            SearchTermLabel::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SearchTermLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTermVerdict {
    pub label: SearchTermLabel,
    pub reason: String,
}

/// Labels a search term against the batch median CPA.
pub fn classify_search_term(
    spend: f64,
    conversions: f64,
    cpa: f64,
    median_cpa: f64,
) -> SearchTermVerdict {
    if conversions >= 1.0 {
        if median_cpa == 0.0 || (cpa > 0.0 && cpa <= median_cpa * WINNER_CPA_FACTOR) {
            return SearchTermVerdict {
                label: SearchTermLabel::Winner,
                reason: format!(
                    "Converted ({conversions:.1}) with efficient CPA ({}).",
                    format_usd(cpa)
                ),
            };
        }
        return SearchTermVerdict {
            label: SearchTermLabel::Neutral,
            reason: format!("Converted ({conversions:.1}) but CPA above efficient threshold."),
        };
    }
    if spend >= LOSER_SPEND_THRESHOLD && conversions == 0.0 {
        return SearchTermVerdict {
            label: SearchTermLabel::Loser,
            reason: format!("Spent {} with 0 conversions.", format_usd(spend)),
        };
    }
    SearchTermVerdict {
        label: SearchTermLabel::Neutral,
        reason: format!(
            "Mixed signal (spend {}, conv {conversions:.1}).",
            format_usd(spend)
        ),
    }
}

/// Median of the samples; the mean of the middle pair for even counts, 0 when empty.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// `$1,234.50`-style rendering.
pub fn format_usd(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, digit) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}
