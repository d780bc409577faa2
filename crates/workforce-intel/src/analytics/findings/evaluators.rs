use super::super::config::FindingConfig;
use super::super::metrics::MetricSnapshot;
use super::templates::{
    category_narrative, ratio_narrative, render_first, similarity_narrative, window_narrative,
    CategoryFacts, RatioFacts, SimilarityFacts, TemplateRule, WindowFacts, CATEGORY_HEADLINES,
    CATEGORY_IMPLICATIONS, FIELD_HEADLINES, FIELD_IMPLICATIONS, SENIORITY_HEADLINES,
    SENIORITY_IMPLICATIONS, SIMILARITY_HEADLINES, SIMILARITY_IMPLICATIONS, STAFFING_HEADLINES,
    STAFFING_IMPLICATIONS, WINDOW_HEADLINES, WINDOW_IMPLICATIONS,
};
use super::{
    ComparisonRow, FindingCandidate, FindingContext, FindingTheme, Priority, StrategicFinding,
};

type Evaluator = fn(&FindingContext<'_>, &FindingConfig) -> Option<FindingCandidate>;

pub(crate) const EVALUATORS: &[Evaluator] = &[
    staffing_pattern,
    category_shift,
    application_window,
    geography,
    competitor_similarity,
    seniority_pattern,
];

const ROWS_PER_FINDING: usize = 3;

fn candidate(
    theme: FindingTheme,
    headline: String,
    narrative: String,
    comparison: Vec<ComparisonRow>,
    implication: String,
    significance: f64,
    config: &FindingConfig,
) -> FindingCandidate {
    FindingCandidate {
        finding: StrategicFinding {
            theme,
            theme_label: theme.label(),
            headline,
            narrative,
            comparison,
            implication,
            priority: Priority::from_score(significance, config),
        },
        significance,
    }
}

struct RatioTheme {
    theme: FindingTheme,
    metric: &'static str,
    row_label: &'static str,
    value: fn(&MetricSnapshot) -> f64,
    threshold: fn(&FindingConfig) -> f64,
    headlines: &'static [TemplateRule<RatioFacts>],
    implications: &'static [TemplateRule<RatioFacts>],
}

const STAFFING: RatioTheme = RatioTheme {
    theme: FindingTheme::StaffingPattern,
    metric: "staff",
    row_label: "Staff positions",
    value: |snapshot| snapshot.staff_ratio,
    threshold: |config| config.structural_gap_pp,
    headlines: STAFFING_HEADLINES,
    implications: STAFFING_IMPLICATIONS,
};

const SENIORITY: RatioTheme = RatioTheme {
    theme: FindingTheme::SeniorityPattern,
    metric: "senior",
    row_label: "Senior positions",
    value: |snapshot| snapshot.senior_ratio,
    threshold: |config| config.seniority_gap_pp,
    headlines: SENIORITY_HEADLINES,
    implications: SENIORITY_IMPLICATIONS,
};

const FIELD: RatioTheme = RatioTheme {
    theme: FindingTheme::Geography,
    metric: "field",
    row_label: "Field positions",
    value: |snapshot| snapshot.field_ratio,
    threshold: |config| config.structural_gap_pp,
    headlines: FIELD_HEADLINES,
    implications: FIELD_IMPLICATIONS,
};

/// Speaks when either the gap to the benchmark or the change since the
/// previous period reaches the theme's threshold.
fn evaluate_ratio(
    theme: &RatioTheme,
    context: &FindingContext<'_>,
    config: &FindingConfig,
) -> Option<FindingCandidate> {
    if context.current.total == 0 || context.benchmark.total == 0 {
        return None;
    }

    let facts = RatioFacts {
        subject: context.subject.to_string(),
        agency_view: context.agency.is_some(),
        benchmark_label: context.benchmark_label.to_string(),
        metric: theme.metric,
        current: (theme.value)(context.current),
        benchmark: (theme.value)(context.benchmark),
        previous: (context.previous.total > 0).then(|| (theme.value)(context.previous)),
    };
    let threshold = (theme.threshold)(config);
    if facts.gap().abs() < threshold && facts.change().abs() < threshold {
        return None;
    }

    let weights = &config.weights;
    let significance =
        facts.gap().abs() * weights.benchmark_gap + facts.change().abs() * weights.period_change;
    let row = ComparisonRow {
        label: theme.row_label.to_string(),
        current: facts.current,
        benchmark: Some(facts.benchmark),
        previous: facts.previous,
        unit: "%",
    };

    Some(candidate(
        theme.theme,
        render_first(theme.headlines, &facts),
        ratio_narrative(&facts),
        vec![row],
        render_first(theme.implications, &facts),
        significance,
        config,
    ))
}

fn staffing_pattern(context: &FindingContext<'_>, config: &FindingConfig) -> Option<FindingCandidate> {
    evaluate_ratio(&STAFFING, context, config)
}

fn seniority_pattern(context: &FindingContext<'_>, config: &FindingConfig) -> Option<FindingCandidate> {
    evaluate_ratio(&SENIORITY, context, config)
}

fn geography(context: &FindingContext<'_>, config: &FindingConfig) -> Option<FindingCandidate> {
    let mut found = evaluate_ratio(&FIELD, context, config)?;
    let home_gap = context.current.home_based_share - context.benchmark.home_based_share;
    found.significance += home_gap.abs() * config.weights.benchmark_gap;
    found.finding.priority = Priority::from_score(found.significance, config);
    found.finding.comparison.push(ComparisonRow {
        label: "Home-based positions".to_string(),
        current: context.current.home_based_share,
        benchmark: Some(context.benchmark.home_based_share),
        previous: (context.previous.total > 0).then_some(context.previous.home_based_share),
        unit: "%",
    });
    Some(found)
}

fn application_window(
    context: &FindingContext<'_>,
    config: &FindingConfig,
) -> Option<FindingCandidate> {
    if context.current.total == 0 || context.benchmark.total == 0 {
        return None;
    }
    let facts = WindowFacts {
        subject: context.subject.to_string(),
        benchmark_label: context.benchmark_label.to_string(),
        average: context.current.avg_application_window,
        benchmark_average: context.benchmark.avg_application_window,
        short_share: context.current.short_window_share,
        benchmark_short_share: context.benchmark.short_window_share,
    };
    if facts.gap_days().abs() < config.window_gap_days {
        return None;
    }

    let weights = &config.weights;
    let significance = facts.gap_days().abs() * weights.window_gap_days
        + facts.short_gap().abs() * weights.benchmark_gap;
    let comparison = vec![
        ComparisonRow {
            label: "Average application window".to_string(),
            current: facts.average,
            benchmark: Some(facts.benchmark_average),
            previous: (context.previous.total > 0)
                .then_some(context.previous.avg_application_window),
            unit: "days",
        },
        ComparisonRow {
            label: "Closing within 10 days".to_string(),
            current: facts.short_share,
            benchmark: Some(facts.benchmark_short_share),
            previous: (context.previous.total > 0).then_some(context.previous.short_window_share),
            unit: "%",
        },
    ];

    Some(candidate(
        FindingTheme::ApplicationWindow,
        render_first(WINDOW_HEADLINES, &facts),
        window_narrative(&facts),
        comparison,
        render_first(WINDOW_IMPLICATIONS, &facts),
        significance,
        config,
    ))
}

/// Reports the category with the largest absolute movement among those
/// large enough and moving fast enough to matter.
fn category_shift(context: &FindingContext<'_>, config: &FindingConfig) -> Option<FindingCandidate> {
    if context.previous.total == 0 {
        return None;
    }

    let mut movers: Vec<_> = context
        .categories
        .iter()
        .filter(|share| share.count.max(share.previous_count) >= config.category_min_positions)
        .filter(|share| share.growth_rate.abs() >= config.category_shift_pct)
        .collect();
    movers.sort_by(|a, b| {
        b.count
            .abs_diff(b.previous_count)
            .cmp(&a.count.abs_diff(a.previous_count))
            .then_with(|| a.category.cmp(&b.category))
    });
    let lead = movers.first()?;

    let facts = CategoryFacts {
        subject: context.subject.to_string(),
        category: lead.category.clone(),
        count: lead.count,
        previous: lead.previous_count,
        growth: lead.growth_rate,
    };
    let weights = &config.weights;
    let significance = lead.growth_rate.abs() * weights.category_growth
        + lead.count.abs_diff(lead.previous_count) as f64 * weights.category_volume;
    let comparison = movers
        .iter()
        .take(ROWS_PER_FINDING)
        .map(|share| ComparisonRow {
            label: share.category.clone(),
            current: share.count as f64,
            benchmark: None,
            previous: Some(share.previous_count as f64),
            unit: "positions",
        })
        .collect();

    Some(candidate(
        FindingTheme::CategoryShift,
        render_first(CATEGORY_HEADLINES, &facts),
        category_narrative(&facts),
        comparison,
        render_first(CATEGORY_IMPLICATIONS, &facts),
        significance,
        config,
    ))
}

fn competitor_similarity(
    context: &FindingContext<'_>,
    config: &FindingConfig,
) -> Option<FindingCandidate> {
    let strongest = context
        .correlations
        .iter()
        .find(|pair| pair.coefficient >= config.similarity_min)?;

    let facts = SimilarityFacts {
        agency_view: context.agency.is_some(),
        agency_a: strongest.agency_a.clone(),
        agency_b: strongest.agency_b.clone(),
        coefficient: strongest.coefficient,
        overlap_label: strongest.overlap_label,
    };
    let comparison = context
        .correlations
        .iter()
        .filter(|pair| pair.coefficient >= config.similarity_min)
        .take(ROWS_PER_FINDING)
        .map(|pair| ComparisonRow {
            label: if facts.agency_view {
                pair.agency_b.clone()
            } else {
                format!("{} / {}", pair.agency_a, pair.agency_b)
            },
            current: pair.coefficient,
            benchmark: None,
            previous: None,
            unit: "r",
        })
        .collect();

    Some(candidate(
        FindingTheme::CompetitorSimilarity,
        render_first(SIMILARITY_HEADLINES, &facts),
        similarity_narrative(&facts),
        comparison,
        render_first(SIMILARITY_IMPLICATIONS, &facts),
        strongest.coefficient * config.weights.similarity,
        config,
    ))
}
