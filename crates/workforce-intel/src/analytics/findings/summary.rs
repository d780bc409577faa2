use super::super::compare::{AgencyCorrelation, AgencyProfile, NewEntrant};
use super::super::metrics::{
    volume_change, CategoryShare, ConcentrationIndex, MetricSnapshot, PyramidShape,
};
use super::super::signals::{Severity, Signal};
use super::templates::{render_first, sentence_case, TemplateRule};
use super::{Priority, StrategicFinding};
use serde::Serialize;

const VOLUME_TOLERANCE_PCT: f64 = 5.0;
const RATIO_TOLERANCE_PP: f64 = 1.0;
const WINDOW_TOLERANCE_DAYS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub fn from_delta(delta: f64, tolerance: f64) -> Self {
        if delta > tolerance {
            Self::Up
        } else if delta < -tolerance {
            Self::Down
        } else {
            Self::Stable
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Stable => "stable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VitalSign {
    pub label: &'static str,
    pub value: String,
    pub trend: Trend,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExecutiveSummary {
    pub paragraphs: Vec<String>,
    pub vital_signs: Vec<VitalSign>,
}

/// Everything the summary paragraphs draw on, already computed by the
/// engine.
#[derive(Debug, Clone)]
pub struct SummaryContext<'c> {
    pub subject: &'c str,
    pub agency: Option<&'c str>,
    pub period_label: &'c str,
    pub comparison_label: &'c str,
    pub benchmark_label: &'c str,
    pub current: &'c MetricSnapshot,
    pub previous: &'c MetricSnapshot,
    pub benchmark: &'c MetricSnapshot,
    /// The agency's own market row; absent in the market view.
    pub profile: Option<&'c AgencyProfile>,
    pub agency_count: usize,
    pub pyramid: PyramidShape,
    pub concentration: &'c ConcentrationIndex,
    pub top_category: Option<&'c CategoryShare>,
    pub correlations: &'c [AgencyCorrelation],
    pub new_entrants: &'c [NewEntrant],
    pub signals: &'c [Signal],
    pub findings: &'c [StrategicFinding],
}

struct VolumeFacts {
    subject: String,
    period: String,
    comparison: String,
    total: usize,
    previous: usize,
}

impl VolumeFacts {
    fn change(&self) -> f64 {
        volume_change(self.total, self.previous)
    }
}

const VOLUME_SENTENCES: &[TemplateRule<VolumeFacts>] = &[
    TemplateRule {
        condition: |f| f.previous == 0,
        render: |f| {
            format!(
                "{} posted {} positions in the {}, with no postings in the comparison period.",
                sentence_case(&f.subject),
                f.total,
                f.period
            )
        },
    },
    TemplateRule {
        condition: |f| f.change() >= VOLUME_TOLERANCE_PCT,
        render: |f| {
            format!(
                "{} posted {} positions in the {}, up {:.0}% {}.",
                sentence_case(&f.subject),
                f.total,
                f.period,
                f.change(),
                f.comparison
            )
        },
    },
    TemplateRule {
        condition: |f| f.change() <= -VOLUME_TOLERANCE_PCT,
        render: |f| {
            format!(
                "{} posted {} positions in the {}, down {:.0}% {}.",
                sentence_case(&f.subject),
                f.total,
                f.period,
                f.change().abs(),
                f.comparison
            )
        },
    },
    TemplateRule {
        condition: |_| true,
        render: |f| {
            format!(
                "{} posted {} positions in the {}, broadly flat {}.",
                sentence_case(&f.subject),
                f.total,
                f.period,
                f.comparison
            )
        },
    },
];

fn volume_paragraph(context: &SummaryContext<'_>) -> Option<String> {
    if context.current.total == 0 {
        return None;
    }
    let facts = VolumeFacts {
        subject: context.subject.to_string(),
        period: context.period_label.to_lowercase(),
        comparison: context.comparison_label.to_string(),
        total: context.current.total,
        previous: context.previous.total,
    };
    let mut paragraph = render_first(VOLUME_SENTENCES, &facts);
    match context.profile {
        Some(profile) => paragraph.push_str(&format!(
            " It ranks #{} of {} hiring agencies with {:.1}% of market volume.",
            profile.rank, context.agency_count, profile.market_share
        )),
        None => paragraph.push_str(&format!(
            " {} agencies posted during the period.",
            context.agency_count
        )),
    }
    Some(paragraph)
}

fn structural_paragraph(context: &SummaryContext<'_>) -> Option<String> {
    if context.pyramid == PyramidShape::Undetermined {
        return None;
    }
    let mut paragraph = format!(
        "The grade structure forms a {}: staff contracts account for {:.1}% of postings and senior grades for {:.1}%, against {:.1}% and {:.1}% for {}.",
        context.pyramid.label(),
        context.current.staff_ratio,
        context.current.senior_ratio,
        context.benchmark.staff_ratio,
        context.benchmark.senior_ratio,
        context.benchmark_label
    );
    match context.top_category {
        Some(top) => paragraph.push_str(&format!(
            " Category hiring is {}, led by {} at {:.1}%.",
            context.concentration.level.label(),
            top.category,
            top.percentage
        )),
        None => paragraph.push_str(&format!(
            " Category hiring is {}.",
            context.concentration.level.label()
        )),
    }
    Some(paragraph)
}

fn competitive_paragraph(context: &SummaryContext<'_>) -> Option<String> {
    let entrants: Vec<&NewEntrant> = context
        .new_entrants
        .iter()
        .filter(|entrant| context.agency != Some(entrant.agency.as_str()))
        .collect();
    let closest = context.correlations.first();
    if closest.is_none() && entrants.is_empty() {
        return None;
    }

    let mut sentences = Vec::new();
    if let Some(pair) = closest {
        sentences.push(match context.agency {
            Some(agency) => format!(
                "{}'s closest hiring peer is {} (r = {:.2}, {}).",
                agency, pair.agency_b, pair.coefficient, pair.overlap_label
            ),
            None => format!(
                "{} and {} show the most similar hiring mix (r = {:.2}, {}).",
                pair.agency_a, pair.agency_b, pair.coefficient, pair.overlap_label
            ),
        });
    }
    if let Some(lead) = entrants.first() {
        sentences.push(format!(
            "{} new entrant{} appeared, led by {} in {} with {} positions.",
            entrants.len(),
            if entrants.len() == 1 { "" } else { "s" },
            lead.agency,
            lead.category,
            lead.positions
        ));
    }
    Some(sentences.join(" "))
}

fn tension_paragraph(context: &SummaryContext<'_>) -> Option<String> {
    if let Some(signal) = context
        .signals
        .iter()
        .find(|signal| signal.severity == Severity::High)
    {
        return Some(format!(
            "Key tension: {}. {}",
            signal.observation, signal.interpretation
        ));
    }
    context
        .findings
        .iter()
        .find(|finding| finding.priority == Priority::High)
        .map(|finding| format!("Key tension: {}. {}", finding.headline, finding.implication))
}

fn vital_signs(context: &SummaryContext<'_>) -> Vec<VitalSign> {
    let current = context.current;
    let previous = context.previous;
    let has_previous = previous.total > 0;
    let ratio_trend = |now: f64, before: f64, tolerance: f64| {
        if has_previous {
            Trend::from_delta(now - before, tolerance)
        } else {
            Trend::Stable
        }
    };

    vec![
        VitalSign {
            label: "Positions",
            value: current.total.to_string(),
            trend: Trend::from_delta(
                volume_change(current.total, previous.total),
                VOLUME_TOLERANCE_PCT,
            ),
        },
        VitalSign {
            label: "Staff ratio",
            value: format!("{:.1}%", current.staff_ratio),
            trend: ratio_trend(current.staff_ratio, previous.staff_ratio, RATIO_TOLERANCE_PP),
        },
        VitalSign {
            label: "Field ratio",
            value: format!("{:.1}%", current.field_ratio),
            trend: ratio_trend(current.field_ratio, previous.field_ratio, RATIO_TOLERANCE_PP),
        },
        VitalSign {
            label: "Senior ratio",
            value: format!("{:.1}%", current.senior_ratio),
            trend: ratio_trend(current.senior_ratio, previous.senior_ratio, RATIO_TOLERANCE_PP),
        },
        VitalSign {
            label: "Avg application window",
            value: format!("{:.1} days", current.avg_application_window),
            trend: ratio_trend(
                current.avg_application_window,
                previous.avg_application_window,
                WINDOW_TOLERANCE_DAYS,
            ),
        },
    ]
}

/// Paragraphs appear in a fixed order: volume and position, structure,
/// competition, key tension. A paragraph whose trigger is absent is skipped.
pub fn executive_summary(context: &SummaryContext<'_>) -> ExecutiveSummary {
    let paragraphs = [
        volume_paragraph(context),
        structural_paragraph(context),
        competitive_paragraph(context),
        tension_paragraph(context),
    ]
    .into_iter()
    .flatten()
    .collect();

    ExecutiveSummary {
        paragraphs,
        vital_signs: vital_signs(context),
    }
}
