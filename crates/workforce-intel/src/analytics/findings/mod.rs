mod evaluators;
mod summary;
mod templates;

pub use summary::{executive_summary, ExecutiveSummary, SummaryContext, Trend, VitalSign};

use super::compare::AgencyCorrelation;
use super::config::FindingConfig;
use super::metrics::{CategoryShare, MetricSnapshot};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingTheme {
    StaffingPattern,
    CategoryShift,
    ApplicationWindow,
    Geography,
    CompetitorSimilarity,
    SeniorityPattern,
}

impl FindingTheme {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::StaffingPattern,
            Self::CategoryShift,
            Self::ApplicationWindow,
            Self::Geography,
            Self::CompetitorSimilarity,
            Self::SeniorityPattern,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::StaffingPattern => "Staffing pattern",
            Self::CategoryShift => "Category shift",
            Self::ApplicationWindow => "Application windows",
            Self::Geography => "Geography",
            Self::CompetitorSimilarity => "Competitor similarity",
            Self::SeniorityPattern => "Seniority pattern",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn from_score(score: f64, config: &FindingConfig) -> Self {
        if score >= config.high_priority_score {
            Self::High
        } else if score >= config.medium_priority_score {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// One line of a finding's comparison table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub label: String,
    pub current: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<f64>,
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategicFinding {
    pub theme: FindingTheme,
    pub theme_label: &'static str,
    pub headline: String,
    pub narrative: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comparison: Vec<ComparisonRow>,
    pub implication: String,
    pub priority: Priority,
}

/// A finding before selection. The score only orders candidates and never
/// leaves this module.
#[derive(Debug, Clone)]
pub(crate) struct FindingCandidate {
    pub(crate) finding: StrategicFinding,
    pub(crate) significance: f64,
}

/// Aggregates the theme evaluators read. `benchmark` is the market in an
/// agency view and the trailing 12 months in the market view.
#[derive(Debug, Clone)]
pub struct FindingContext<'c> {
    pub subject: &'c str,
    pub agency: Option<&'c str>,
    pub benchmark_label: &'c str,
    pub current: &'c MetricSnapshot,
    pub previous: &'c MetricSnapshot,
    pub benchmark: &'c MetricSnapshot,
    pub categories: &'c [CategoryShare],
    /// Similar agencies in an agency view, strongest market pairs otherwise.
    pub correlations: &'c [AgencyCorrelation],
}

pub(crate) fn rank_candidates(
    context: &FindingContext<'_>,
    config: &FindingConfig,
) -> Vec<FindingCandidate> {
    let mut candidates: Vec<FindingCandidate> = evaluators::EVALUATORS
        .iter()
        .filter_map(|evaluate| evaluate(context, config))
        .collect();

    let generated = candidates.len();
    candidates.sort_by(|a, b| b.significance.total_cmp(&a.significance));
    candidates.truncate(config.max_findings);

    debug!(
        subject = context.subject,
        generated,
        kept = candidates.len(),
        "finding candidates ranked"
    );
    candidates
}

/// Generates one candidate per theme that has something to say and keeps the
/// most significant ones, most significant first.
pub fn synthesize(context: &FindingContext<'_>, config: &FindingConfig) -> Vec<StrategicFinding> {
    rank_candidates(context, config)
        .into_iter()
        .map(|candidate| candidate.finding)
        .collect()
}

#[cfg(test)]
mod tests;
