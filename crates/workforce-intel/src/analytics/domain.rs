use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const UNCATEGORIZED: &str = "Uncategorized";
pub const UNSPECIFIED_REGION: &str = "Unspecified";

/// Where a posting is physically based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Field,
    Headquarters,
    RegionalHub,
    HomeBased,
}

impl LocationType {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Field,
            Self::Headquarters,
            Self::RegionalHub,
            Self::HomeBased,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Field => "Field",
            Self::Headquarters => "Headquarters",
            Self::RegionalHub => "Regional Hub",
            Self::HomeBased => "Home-based",
        }
    }

    /// Lenient parse used by ingestion; unknown text yields `None` so the
    /// duty-station heuristics get a chance later.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .collect();

        match normalized.as_str() {
            "field" | "fieldbased" | "country" | "countryoffice" => Some(Self::Field),
            "hq" | "headquarters" => Some(Self::Headquarters),
            "regionalhub" | "regional" | "hub" | "regionaloffice" => Some(Self::RegionalHub),
            "homebased" | "home" | "remote" => Some(Self::HomeBased),
            _ => None,
        }
    }
}

/// Normalized job posting as supplied by the upstream pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    pub posting_date: Option<NaiveDate>,
    pub apply_until: Option<NaiveDate>,
    pub agency: String,
    pub primary_category: Option<String>,
    pub grade_code: String,
    pub duty_station: String,
    pub duty_country: String,
    pub region: Option<String>,
    pub location_type: Option<LocationType>,
    #[serde(default)]
    pub is_home_based: bool,
}

impl JobRecord {
    /// Days between posting and closing; `None` when either date is missing.
    pub fn application_window_days(&self) -> Option<i64> {
        match (self.posting_date, self.apply_until) {
            (Some(posted), Some(closes)) => Some((closes - posted).num_days()),
            _ => None,
        }
    }

    pub fn category(&self) -> &str {
        self.primary_category
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(UNCATEGORIZED)
    }

    pub fn region_label(&self) -> &str {
        self.region
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(UNSPECIFIED_REGION)
    }
}
