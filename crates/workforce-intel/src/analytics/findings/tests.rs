use super::*;
use crate::analytics::compare::OverlapLevel;
use crate::analytics::metrics::growth_rate;

fn snapshot(total: usize, staff: f64, senior: f64, field: f64, window: f64) -> MetricSnapshot {
    MetricSnapshot {
        total,
        staff_ratio: staff,
        field_ratio: field,
        senior_ratio: senior,
        home_based_share: 2.0,
        avg_application_window: window,
        short_window_share: 10.0,
    }
}

fn share(category: &str, count: usize, previous_count: usize) -> CategoryShare {
    CategoryShare {
        category: category.to_string(),
        count,
        percentage: 0.0,
        previous_count,
        growth_rate: growth_rate(count, previous_count),
    }
}

fn pair(a: &str, b: &str, coefficient: f64) -> AgencyCorrelation {
    AgencyCorrelation {
        agency_a: a.to_string(),
        agency_b: b.to_string(),
        coefficient,
        overlap: OverlapLevel::Strong,
        overlap_label: OverlapLevel::Strong.label(),
    }
}

struct Fixture {
    current: MetricSnapshot,
    previous: MetricSnapshot,
    benchmark: MetricSnapshot,
    categories: Vec<CategoryShare>,
    correlations: Vec<AgencyCorrelation>,
}

impl Fixture {
    fn quiet() -> Self {
        Self {
            current: snapshot(100, 50.0, 20.0, 60.0, 14.0),
            previous: snapshot(100, 50.0, 20.0, 60.0, 14.0),
            benchmark: snapshot(1_000, 50.0, 20.0, 60.0, 14.0),
            categories: vec![share("Health", 50, 50), share("Education", 50, 50)],
            correlations: Vec::new(),
        }
    }

    fn context<'c>(&'c self, agency: Option<&'c str>) -> FindingContext<'c> {
        FindingContext {
            subject: agency.unwrap_or("the market"),
            agency,
            benchmark_label: if agency.is_some() {
                "the market"
            } else {
                "the 12-month baseline"
            },
            current: &self.current,
            previous: &self.previous,
            benchmark: &self.benchmark,
            categories: &self.categories,
            correlations: &self.correlations,
        }
    }
}

#[test]
fn quiet_period_produces_no_findings() {
    let fixture = Fixture::quiet();
    assert!(synthesize(&fixture.context(Some("UNDP")), &FindingConfig::default()).is_empty());
}

#[test]
fn empty_slice_produces_no_findings() {
    let mut fixture = Fixture::quiet();
    fixture.current = MetricSnapshot::default();
    fixture.categories.clear();
    assert!(synthesize(&fixture.context(Some("UNDP")), &FindingConfig::default()).is_empty());
}

#[test]
fn staff_ratio_drop_leads_with_temporal_change() {
    let mut fixture = Fixture::quiet();
    fixture.current.staff_ratio = 20.0;
    fixture.benchmark.staff_ratio = 20.0;

    let findings = synthesize(&fixture.context(Some("UNDP")), &FindingConfig::default());
    assert_eq!(findings.len(), 1);
    let finding = &findings[0];
    assert_eq!(finding.theme, FindingTheme::StaffingPattern);
    assert_eq!(finding.headline, "UNDP staff share fell 30.0pp to 20.0%");
    assert_eq!(finding.priority, Priority::High);
    assert_eq!(finding.comparison[0].previous, Some(50.0));
    assert_eq!(finding.comparison[0].benchmark, Some(20.0));
}

#[test]
fn gap_without_change_uses_benchmark_template() {
    let mut fixture = Fixture::quiet();
    fixture.current.senior_ratio = 26.0;
    fixture.previous.senior_ratio = 26.0;

    let findings = synthesize(&fixture.context(None), &FindingConfig::default());
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].theme, FindingTheme::SeniorityPattern);
    assert_eq!(
        findings[0].headline,
        "The market recruits a more senior profile than the 12-month baseline"
    );
    assert_eq!(findings[0].priority, Priority::Low);
}

#[test]
fn selection_keeps_the_five_most_significant() {
    let mut fixture = Fixture::quiet();
    fixture.current.staff_ratio = 20.0;
    fixture.current.senior_ratio = 30.0;
    fixture.current.field_ratio = 30.0;
    fixture.current.avg_application_window = 7.0;
    fixture.current.short_window_share = 40.0;
    fixture.categories = vec![share("Health", 20, 5), share("Education", 80, 95)];
    fixture.correlations = vec![pair("UNDP", "UNEP", 0.9), pair("UNDP", "FAO", 0.7)];

    let config = FindingConfig::default();
    let ranked = rank_candidates(&fixture.context(Some("UNDP")), &config);
    assert_eq!(ranked.len(), 5);
    assert!(ranked
        .windows(2)
        .all(|pair| pair[0].significance >= pair[1].significance));

    let themes: Vec<FindingTheme> = ranked.iter().map(|c| c.finding.theme).collect();
    assert_eq!(
        themes,
        vec![
            FindingTheme::CategoryShift,
            FindingTheme::StaffingPattern,
            FindingTheme::Geography,
            FindingTheme::ApplicationWindow,
            FindingTheme::CompetitorSimilarity,
        ]
    );

    let findings = synthesize(&fixture.context(Some("UNDP")), &config);
    assert_eq!(findings[0].headline, "Health hiring expanded 300%");
    assert_eq!(findings[3].headline, "UNDP closes postings 7.0 days faster than the market");
    assert_eq!(findings[4].headline, "UNDP hires for the same profiles as UNEP");
    assert_eq!(findings[4].comparison.len(), 2);
}

#[test]
fn market_view_similarity_names_both_agencies() {
    let mut fixture = Fixture::quiet();
    fixture.correlations = vec![pair("UNHCR", "IOM", 0.85), pair("WFP", "FAO", 0.5)];

    let findings = synthesize(&fixture.context(None), &FindingConfig::default());
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].headline, "UNHCR and IOM compete for the same talent");
    assert_eq!(findings[0].comparison[0].label, "UNHCR / IOM");
    assert_eq!(findings[0].comparison.len(), 1);
}

#[test]
fn summary_skips_paragraphs_without_triggers() {
    let fixture = Fixture::quiet();
    let concentration = crate::analytics::metrics::concentration_index([50, 50]);
    let context = SummaryContext {
        subject: "the market",
        agency: None,
        period_label: "Last 3 months",
        comparison_label: "vs. previous 3 months",
        benchmark_label: "the 12-month baseline",
        current: &fixture.current,
        previous: &fixture.previous,
        benchmark: &fixture.benchmark,
        profile: None,
        agency_count: 12,
        pyramid: crate::analytics::metrics::PyramidShape::Undetermined,
        concentration: &concentration,
        top_category: None,
        correlations: &[],
        new_entrants: &[],
        signals: &[],
        findings: &[],
    };

    let summary = executive_summary(&context);
    assert_eq!(summary.paragraphs.len(), 1);
    assert_eq!(
        summary.paragraphs[0],
        "The market posted 100 positions in the last 3 months, broadly flat vs. previous 3 months. 12 agencies posted during the period."
    );
    let labels: Vec<&str> = summary.vital_signs.iter().map(|sign| sign.label).collect();
    assert_eq!(
        labels,
        vec!["Positions", "Staff ratio", "Field ratio", "Senior ratio", "Avg application window"]
    );
    assert!(summary
        .vital_signs
        .iter()
        .all(|sign| sign.trend == Trend::Stable));
}
