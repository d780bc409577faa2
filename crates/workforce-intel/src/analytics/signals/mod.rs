mod rules;

use super::compare::NewEntrant;
use super::config::SignalThresholds;
use super::metrics::{CategoryShare, ConcentrationIndex, MetricSnapshot};
use serde::Serialize;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    SeniorityDrift,
    ShortApplicationWindows,
    HomeBasedGrowth,
    NewCompetitor,
    CategoryDecline,
    StaffRatioDrift,
    VolumeShift,
    CategoryConcentration,
}

impl SignalType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SeniorityDrift => "Seniority drift",
            Self::ShortApplicationWindows => "Short application windows",
            Self::HomeBasedGrowth => "Home-based growth",
            Self::NewCompetitor => "New competitor",
            Self::CategoryDecline => "Category decline",
            Self::StaffRatioDrift => "Staff ratio drift",
            Self::VolumeShift => "Volume shift",
            Self::CategoryConcentration => "Category concentration",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
}

impl Severity {
    /// High when the deviation exceeds its threshold by more than `multiple`.
    pub fn from_excess(deviation: f64, threshold: f64, multiple: f64) -> Self {
        if threshold > 0.0 && deviation.abs() / threshold > multiple {
            Self::High
        } else {
            Self::Medium
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
        }
    }

    const fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
        }
    }
}

/// Short rule-triggered observation about the analysed slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub signal_type: SignalType,
    pub severity: Severity,
    pub observation: String,
    pub interpretation: String,
}

/// Everything the rule catalog reads. All values are precomputed by the
/// engine; rules never look at individual records.
#[derive(Debug, Clone)]
pub struct SignalContext<'c> {
    pub subject: &'c str,
    pub agency: Option<&'c str>,
    pub current: &'c MetricSnapshot,
    pub previous: &'c MetricSnapshot,
    pub historical: &'c MetricSnapshot,
    pub market: &'c MetricSnapshot,
    pub categories: &'c [CategoryShare],
    pub concentration: &'c ConcentrationIndex,
    pub previous_concentration: &'c ConcentrationIndex,
    pub new_entrants: &'c [NewEntrant],
    pub entrant_min_positions: usize,
}

impl SignalContext<'_> {
    pub fn is_agency_view(&self) -> bool {
        self.agency.is_some()
    }
}

/// Runs the rule catalog in order and keeps at most `max_signals`, dropping
/// medium-severity signals before high ones. Signals of equal severity keep
/// catalog order.
pub fn detect(context: &SignalContext<'_>, thresholds: &SignalThresholds) -> Vec<Signal> {
    let mut signals = Vec::new();
    for rule in rules::SIGNAL_RULES {
        let fired = (rule.evaluate)(context, thresholds);
        if !fired.is_empty() {
            trace!(rule = rule.signal_type.label(), count = fired.len(), "signal rule fired");
        }
        signals.extend(fired);
    }

    let triggered = signals.len();
    signals.sort_by_key(|signal| signal.severity.rank());
    signals.truncate(thresholds.max_signals);

    debug!(
        subject = context.subject,
        triggered,
        kept = signals.len(),
        "signal catalog evaluated"
    );
    signals
}
