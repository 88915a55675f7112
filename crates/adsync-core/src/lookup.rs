//! Provider enum normalization.
//!
//! Google Ads returns enums as upper-snake names (`"ENABLED"`, `"EXACT"`, ...).
//! Each table here parses those names into a typed variant with an `Other`
//! catch-all holding the raw name, and maps variants to the labels stored
//! downstream. Unrecognized names fall back per table.

use serde::Deserialize;

const UNSPECIFIED: &str = "UNSPECIFIED";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum CampaignStatus {
    Enabled,
    Paused,
    Removed,
    Other(String),
}

impl CampaignStatus {
    pub fn from_api(name: &str) -> Self {
        match name {
            "ENABLED" => Self::Enabled,
            "PAUSED" => Self::Paused,
            "REMOVED" => Self::Removed,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Paused => "paused",
            Self::Removed => "ended",
            Self::Other(_) => "paused",
        }
    }
}

impl Default for CampaignStatus {
    fn default() -> Self {
        Self::Other(UNSPECIFIED.to_string())
    }
}

impl From<String> for CampaignStatus {
    fn from(value: String) -> Self {
        Self::from_api(&value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum MatchType {
    Exact,
    Phrase,
    Broad,
    Other(String),
}

impl MatchType {
    pub fn from_api(name: &str) -> Self {
        match name {
            "EXACT" => Self::Exact,
            "PHRASE" => Self::Phrase,
            "BROAD" => Self::Broad,
            other => Self::Other(other.to_string()),
        }
    }

    /// Provider name, used as part of synthetic identifiers.
    pub fn api_name(&self) -> &str {
        match self {
            Self::Exact => "EXACT",
            Self::Phrase => "PHRASE",
            Self::Broad => "BROAD",
            Self::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Exact => "Exact",
            Self::Phrase => "Phrase",
            Self::Broad | Self::Other(_) => "Broad",
        }
    }
}

impl Default for MatchType {
    fn default() -> Self {
        Self::Other(UNSPECIFIED.to_string())
    }
}

impl From<String> for MatchType {
    fn from(value: String) -> Self {
        Self::from_api(&value)
    }
}

/// Quality score component rating (expected CTR, ad relevance, landing page).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum QualityRating {
    AboveAverage,
    Average,
    BelowAverage,
    Other(String),
}

impl QualityRating {
    pub fn from_api(name: &str) -> Self {
        match name {
            "ABOVE_AVERAGE" => Self::AboveAverage,
            "AVERAGE" => Self::Average,
            "BELOW_AVERAGE" => Self::BelowAverage,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::AboveAverage => "Above Average",
            Self::Average => "Average",
            Self::BelowAverage => "Below Average",
            Self::Other(_) => "",
        }
    }
}

impl Default for QualityRating {
    fn default() -> Self {
        Self::Other(UNSPECIFIED.to_string())
    }
}

impl From<String> for QualityRating {
    fn from(value: String) -> Self {
        Self::from_api(&value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Device {
    Mobile,
    Desktop,
    Tablet,
    ConnectedTv,
    Other(String),
}

impl Device {
    pub fn from_api(name: &str) -> Self {
        match name {
            "MOBILE" => Self::Mobile,
            "DESKTOP" => Self::Desktop,
            "TABLET" => Self::Tablet,
            "CONNECTED_TV" => Self::ConnectedTv,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Mobile => "Mobile",
            Self::Desktop => "Desktop",
            Self::Tablet => "Tablet",
            Self::ConnectedTv => "Connected TV",
            Self::Other(_) => "Other",
        }
    }
}

impl Default for Device {
    fn default() -> Self {
        Self::Other(UNSPECIFIED.to_string())
    }
}

impl From<String> for Device {
    fn from(value: String) -> Self {
        Self::from_api(&value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
    Other(String),
}

impl DayOfWeek {
    pub fn from_api(name: &str) -> Self {
        match name {
            "MONDAY" => Self::Monday,
            "TUESDAY" => Self::Tuesday,
            "WEDNESDAY" => Self::Wednesday,
            "THURSDAY" => Self::Thursday,
            "FRIDAY" => Self::Friday,
            "SATURDAY" => Self::Saturday,
            "SUNDAY" => Self::Sunday,
            other => Self::Other(other.to_string()),
        }
    }

    /// Unknown days keep the provider's raw name.
    pub fn label(&self) -> &str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
            Self::Other(raw) => raw,
        }
    }
}

impl Default for DayOfWeek {
    fn default() -> Self {
        Self::Other(UNSPECIFIED.to_string())
    }
}

impl From<String> for DayOfWeek {
    fn from(value: String) -> Self {
        Self::from_api(&value)
    }
}

/// Provider enum stored as its raw name (ad strength, location type, ...).
/// Absent or empty names read as `UNSPECIFIED`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct EnumName(String);

impl EnumName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EnumName {
    fn default() -> Self {
        Self(UNSPECIFIED.to_string())
    }
}

impl From<String> for EnumName {
    fn from(value: String) -> Self {
        if value.is_empty() {
            Self::default()
        } else {
            Self(value)
        }
    }
}

impl From<EnumName> for String {
    fn from(value: EnumName) -> Self {
        value.0
    }
}

const US_STATE_CODES: [(&str, &str); 51] = [
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("District of Columbia", "DC"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];

/// Postal abbreviation for a US state (or DC) by its Google Ads geo name.
pub fn us_state_code(name: &str) -> Option<&'static str> {
    US_STATE_CODES
        .iter()
        .find(|(state, _)| *state == name)
        .map(|(_, code)| *code)
}
