use serde::{Deserialize, Serialize};

pub const CORRELATION_TOP_K: usize = 6;
pub const NEW_ENTRANT_MIN_POSITIONS: usize = 5;
pub const NEW_ENTRANT_PREVIOUS_FLOOR: usize = 0;
pub const STRONG_OVERLAP: f64 = 0.8;
pub const MODERATE_OVERLAP: f64 = 0.6;
pub const SOME_OVERLAP: f64 = 0.4;

pub const SENIORITY_DRIFT_PP: f64 = 4.0;
pub const SHORT_WINDOW_SHARE_PCT: f64 = 30.0;
pub const PEER_MULTIPLE: f64 = 1.5;
pub const HOME_BASED_SHARE_PCT: f64 = 8.0;
pub const CATEGORY_DECLINE_PCT: f64 = 30.0;
pub const CATEGORY_MIN_PREVIOUS: usize = 5;
pub const STAFF_RATIO_DRIFT_PP: f64 = 12.0;
pub const VOLUME_SHIFT_PCT: f64 = 25.0;
pub const VOLUME_MIN_PREVIOUS: usize = 10;
pub const CONCENTRATION_HERFINDAHL: f64 = 25.0;
pub const CONCENTRATION_RISE: f64 = 5.0;
pub const HIGH_SEVERITY_MULTIPLE: f64 = 1.5;
pub const MAX_SIGNALS: usize = 8;
pub const MAX_ENTRANT_SIGNALS: usize = 3;

pub const MAX_FINDINGS: usize = 5;
pub const STRUCTURAL_GAP_PP: f64 = 10.0;
pub const WINDOW_GAP_DAYS: f64 = 3.0;
pub const SIMILARITY_MIN: f64 = 0.6;
pub const HIGH_PRIORITY_SCORE: f64 = 30.0;
pub const MEDIUM_PRIORITY_SCORE: f64 = 15.0;

pub const LISTING_LIMIT: usize = 10;

/// Tunables for one brief run. Every field has the documented default, so a
/// partial JSON override only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub comparison: ComparisonConfig,
    pub signals: SignalThresholds,
    pub findings: FindingConfig,
    /// Cap on ranked listings (agencies, duty stations, leaders) in a brief.
    pub listing_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            comparison: ComparisonConfig::default(),
            signals: SignalThresholds::default(),
            findings: FindingConfig::default(),
            listing_limit: LISTING_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Only the largest agencies take part in pairwise correlation.
    pub top_k: usize,
    pub new_entrant_min_positions: usize,
    /// Previous-period count at or below which an agency counts as absent.
    pub new_entrant_previous_floor: usize,
    pub strong_overlap: f64,
    pub moderate_overlap: f64,
    pub some_overlap: f64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            top_k: CORRELATION_TOP_K,
            new_entrant_min_positions: NEW_ENTRANT_MIN_POSITIONS,
            new_entrant_previous_floor: NEW_ENTRANT_PREVIOUS_FLOOR,
            strong_overlap: STRONG_OVERLAP,
            moderate_overlap: MODERATE_OVERLAP,
            some_overlap: SOME_OVERLAP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalThresholds {
    pub seniority_drift_pp: f64,
    pub short_window_share: f64,
    pub short_window_market_multiple: f64,
    pub home_based_share: f64,
    pub home_based_growth_multiple: f64,
    pub category_decline_pct: f64,
    pub category_min_previous: usize,
    pub staff_ratio_drift_pp: f64,
    pub volume_shift_pct: f64,
    pub volume_min_previous: usize,
    pub concentration_herfindahl: f64,
    pub concentration_rise: f64,
    /// Deviation-to-threshold ratio above which a signal is high severity.
    pub high_severity_multiple: f64,
    pub max_entrant_signals: usize,
    pub max_signals: usize,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            seniority_drift_pp: SENIORITY_DRIFT_PP,
            short_window_share: SHORT_WINDOW_SHARE_PCT,
            short_window_market_multiple: PEER_MULTIPLE,
            home_based_share: HOME_BASED_SHARE_PCT,
            home_based_growth_multiple: PEER_MULTIPLE,
            category_decline_pct: CATEGORY_DECLINE_PCT,
            category_min_previous: CATEGORY_MIN_PREVIOUS,
            staff_ratio_drift_pp: STAFF_RATIO_DRIFT_PP,
            volume_shift_pct: VOLUME_SHIFT_PCT,
            volume_min_previous: VOLUME_MIN_PREVIOUS,
            concentration_herfindahl: CONCENTRATION_HERFINDAHL,
            concentration_rise: CONCENTRATION_RISE,
            high_severity_multiple: HIGH_SEVERITY_MULTIPLE,
            max_entrant_signals: MAX_ENTRANT_SIGNALS,
            max_signals: MAX_SIGNALS,
        }
    }
}

/// Multipliers applied to deviation magnitudes when ranking findings.
/// Only the relative ordering they produce matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignificanceWeights {
    /// Per percentage point of gap against the benchmark.
    pub benchmark_gap: f64,
    /// Per percentage point of change against the previous period.
    pub period_change: f64,
    /// Per percent of category growth or decline.
    pub category_growth: f64,
    /// Per position an agency enters or leaves a category with.
    pub category_volume: f64,
    /// Per day of application-window gap.
    pub window_gap_days: f64,
    /// Per unit of correlation coefficient.
    pub similarity: f64,
}

impl Default for SignificanceWeights {
    fn default() -> Self {
        Self {
            benchmark_gap: 1.0,
            period_change: 1.0,
            category_growth: 0.2,
            category_volume: 0.5,
            window_gap_days: 2.0,
            similarity: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FindingConfig {
    pub max_findings: usize,
    pub weights: SignificanceWeights,
    /// Minimum gap or change, in points, before a ratio theme speaks.
    pub structural_gap_pp: f64,
    pub seniority_gap_pp: f64,
    pub window_gap_days: f64,
    pub category_shift_pct: f64,
    pub category_min_positions: usize,
    pub similarity_min: f64,
    pub high_priority_score: f64,
    pub medium_priority_score: f64,
}

impl Default for FindingConfig {
    fn default() -> Self {
        Self {
            max_findings: MAX_FINDINGS,
            weights: SignificanceWeights::default(),
            structural_gap_pp: STRUCTURAL_GAP_PP,
            seniority_gap_pp: SENIORITY_DRIFT_PP,
            window_gap_days: WINDOW_GAP_DAYS,
            category_shift_pct: CATEGORY_DECLINE_PCT,
            category_min_positions: CATEGORY_MIN_PREVIOUS,
            similarity_min: SIMILARITY_MIN,
            high_priority_score: HIGH_PRIORITY_SCORE,
            medium_priority_score: MEDIUM_PRIORITY_SCORE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_remaining_defaults() {
        let config: EngineConfig = serde_json::from_str(
            r#"{ "comparison": { "top_k": 4 }, "signals": { "max_signals": 6 } }"#,
        )
        .expect("partial config parses");

        assert_eq!(config.comparison.top_k, 4);
        assert_eq!(config.comparison.strong_overlap, STRONG_OVERLAP);
        assert_eq!(config.signals.max_signals, 6);
        assert_eq!(config.signals.seniority_drift_pp, SENIORITY_DRIFT_PP);
        assert_eq!(config.findings, FindingConfig::default());
        assert_eq!(config.listing_limit, LISTING_LIMIT);
    }
}
