mod header;

pub(crate) use header::header_metrics;

use super::compare::{AgencyCorrelation, AgencyProfile, CategoryLeader, NewEntrant};
use super::findings::{ExecutiveSummary, StrategicFinding, Trend};
use super::metrics::{
    CategoryShare, ConcentrationIndex, ConsolidatedShare, LocationShare, NamedCount,
    PyramidShape, TierShare, WeeklyVolumeBreakdown, WindowBucket,
};
use super::period::{PeriodWindow, TimeRange};
use super::signals::Signal;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderMetric {
    pub label: &'static str,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<String>,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeMetrics {
    pub total_positions: usize,
    pub previous_positions: usize,
    pub volume_change: f64,
    pub market_positions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_share: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    pub weekly: WeeklyVolumeBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkforceMetrics {
    pub staff_ratio: f64,
    pub previous_staff_ratio: f64,
    /// Percentage points against the previous period.
    pub staff_ratio_change: f64,
    pub benchmark_staff_ratio: f64,
    pub senior_ratio: f64,
    pub senior_ratio_change: f64,
    pub historical_senior_ratio: f64,
    pub tiers: Vec<TierShare>,
    pub consolidated_tiers: Vec<ConsolidatedShare>,
    pub pyramid_shape: PyramidShape,
    pub pyramid_label: &'static str,
    pub avg_application_window: f64,
    pub benchmark_application_window: f64,
    pub short_window_share: f64,
    pub window_distribution: Vec<WindowBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeographicMetrics {
    pub field_ratio: f64,
    pub field_ratio_change: f64,
    pub benchmark_field_ratio: f64,
    pub home_based_share: f64,
    pub location_mix: Vec<LocationShare>,
    pub top_duty_stations: Vec<NamedCount>,
    pub top_countries: Vec<NamedCount>,
    pub regions: Vec<NamedCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMetrics {
    pub categories: Vec<CategoryShare>,
    pub concentration: ConcentrationIndex,
    pub previous_concentration: ConcentrationIndex,
    /// Growing categories, fastest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fastest_growing: Vec<CategoryShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitiveMetrics {
    pub agency_count: usize,
    pub market_concentration: ConcentrationIndex,
    pub top_agencies: Vec<AgencyProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agency_profile: Option<AgencyProfile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub correlations: Vec<AgencyCorrelation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub similar_agencies: Vec<AgencyCorrelation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub new_entrants: Vec<NewEntrant>,
    pub category_leaders: Vec<CategoryLeader>,
}

/// Everything the dashboard renders for one time range and optional agency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntelligenceBrief {
    pub generated_at: NaiveDate,
    pub time_range: TimeRange,
    pub period_label: String,
    pub comparison_label: String,
    pub current_period: PeriodWindow,
    pub previous_period: PeriodWindow,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agency_name: Option<String>,
    pub is_agency_view: bool,
    pub header_metrics: Vec<HeaderMetric>,
    pub executive_summary: ExecutiveSummary,
    pub volume_metrics: VolumeMetrics,
    pub workforce_metrics: WorkforceMetrics,
    pub geographic_metrics: GeographicMetrics,
    pub category_metrics: CategoryMetrics,
    pub competitive_metrics: CompetitiveMetrics,
    pub signals: Vec<Signal>,
    pub findings: Vec<StrategicFinding>,
}
