use super::super::config::SignalThresholds;
use super::super::metrics::volume_change;
use super::{Severity, Signal, SignalContext, SignalType};
use std::collections::BTreeSet;

type RuleFn = fn(&SignalContext<'_>, &SignalThresholds) -> Vec<Signal>;

pub(crate) struct SignalRule {
    pub(crate) signal_type: SignalType,
    pub(crate) evaluate: RuleFn,
}

/// Evaluation order doubles as the tie-break between equal severities.
pub(crate) const SIGNAL_RULES: &[SignalRule] = &[
    SignalRule {
        signal_type: SignalType::SeniorityDrift,
        evaluate: seniority_drift,
    },
    SignalRule {
        signal_type: SignalType::ShortApplicationWindows,
        evaluate: short_windows,
    },
    SignalRule {
        signal_type: SignalType::HomeBasedGrowth,
        evaluate: home_based_growth,
    },
    SignalRule {
        signal_type: SignalType::NewCompetitor,
        evaluate: new_competitors,
    },
    SignalRule {
        signal_type: SignalType::CategoryDecline,
        evaluate: category_decline,
    },
    SignalRule {
        signal_type: SignalType::StaffRatioDrift,
        evaluate: staff_ratio_drift,
    },
    SignalRule {
        signal_type: SignalType::VolumeShift,
        evaluate: volume_shift,
    },
    SignalRule {
        signal_type: SignalType::CategoryConcentration,
        evaluate: category_concentration,
    },
];

fn signal(
    signal_type: SignalType,
    severity: Severity,
    observation: String,
    interpretation: &str,
) -> Vec<Signal> {
    vec![Signal {
        signal_type,
        severity,
        observation,
        interpretation: interpretation.to_string(),
    }]
}

fn direction(delta: f64) -> &'static str {
    if delta >= 0.0 {
        "up"
    } else {
        "down"
    }
}

fn seniority_drift(context: &SignalContext<'_>, thresholds: &SignalThresholds) -> Vec<Signal> {
    if context.current.total == 0 || context.historical.total == 0 {
        return Vec::new();
    }
    let drift = context.current.senior_ratio - context.historical.senior_ratio;
    if drift.abs() < thresholds.seniority_drift_pp {
        return Vec::new();
    }

    let interpretation = if drift > 0.0 {
        "Hiring is tilting toward senior and leadership grades; expect longer recruitment cycles and tighter competition for experienced candidates."
    } else {
        "Recruitment is shifting toward junior and support grades, which often accompanies programme scale-up or cost containment."
    };
    signal(
        SignalType::SeniorityDrift,
        Severity::from_excess(
            drift,
            thresholds.seniority_drift_pp,
            thresholds.high_severity_multiple,
        ),
        format!(
            "Senior roles at {:.1}% of {} postings, {} {:.1}pp on the 12-month baseline of {:.1}%",
            context.current.senior_ratio,
            context.subject,
            direction(drift),
            drift.abs(),
            context.historical.senior_ratio
        ),
        interpretation,
    )
}

fn short_windows(context: &SignalContext<'_>, thresholds: &SignalThresholds) -> Vec<Signal> {
    if context.current.total == 0 {
        return Vec::new();
    }
    let share = context.current.short_window_share;
    let absolute_excess = share / thresholds.short_window_share;
    let peer_excess = if context.is_agency_view() && context.market.short_window_share > 0.0 {
        share / context.market.short_window_share / thresholds.short_window_market_multiple
    } else {
        0.0
    };

    if absolute_excess <= 1.0 && peer_excess <= 1.0 {
        return Vec::new();
    }

    let severity = if absolute_excess.max(peer_excess) > thresholds.high_severity_multiple {
        Severity::High
    } else {
        Severity::Medium
    };
    let observation = if peer_excess > absolute_excess {
        format!(
            "{:.1}% of {} postings close in under 10 days, against {:.1}% across the market",
            share, context.subject, context.market.short_window_share
        )
    } else {
        format!(
            "{:.1}% of {} postings close in under 10 days",
            share, context.subject
        )
    };
    signal(
        SignalType::ShortApplicationWindows,
        severity,
        observation,
        "Short windows narrow the candidate pool and often point to urgent or pre-identified hires.",
    )
}

fn home_based_growth(context: &SignalContext<'_>, thresholds: &SignalThresholds) -> Vec<Signal> {
    let share = context.current.home_based_share;
    let previous = context.previous.home_based_share;
    if share <= thresholds.home_based_share
        || share <= previous * thresholds.home_based_growth_multiple
    {
        return Vec::new();
    }

    signal(
        SignalType::HomeBasedGrowth,
        Severity::from_excess(
            share,
            thresholds.home_based_share,
            thresholds.high_severity_multiple,
        ),
        format!(
            "Home-based postings reached {:.1}% of {} volume, from {:.1}% last period",
            share, context.subject, previous
        ),
        "Remote arrangements are widening the talent pool beyond duty-station constraints.",
    )
}

fn new_competitors(context: &SignalContext<'_>, thresholds: &SignalThresholds) -> Vec<Signal> {
    let active: BTreeSet<&str> = context
        .categories
        .iter()
        .filter(|share| share.count > 0)
        .map(|share| share.category.as_str())
        .collect();

    context
        .new_entrants
        .iter()
        .filter(|entrant| match context.agency {
            Some(agency) => entrant.agency != agency && active.contains(entrant.category.as_str()),
            None => true,
        })
        .take(thresholds.max_entrant_signals)
        .map(|entrant| Signal {
            signal_type: SignalType::NewCompetitor,
            severity: Severity::from_excess(
                entrant.positions as f64,
                context.entrant_min_positions as f64,
                thresholds.high_severity_multiple,
            ),
            observation: format!(
                "{} entered {} with {} positions ({} last period)",
                entrant.agency, entrant.category, entrant.positions, entrant.previous_positions
            ),
            interpretation: format!(
                "A new recruiter in {} will compete for the same candidate pool.",
                entrant.category
            ),
        })
        .collect()
}

fn category_decline(context: &SignalContext<'_>, thresholds: &SignalThresholds) -> Vec<Signal> {
    context
        .categories
        .iter()
        .filter(|share| share.previous_count >= thresholds.category_min_previous)
        .filter(|share| -share.growth_rate > thresholds.category_decline_pct)
        .map(|share| Signal {
            signal_type: SignalType::CategoryDecline,
            severity: Severity::from_excess(
                share.growth_rate,
                thresholds.category_decline_pct,
                thresholds.high_severity_multiple,
            ),
            observation: format!(
                "{} postings fell {:.0}% ({} to {})",
                share.category,
                -share.growth_rate,
                share.previous_count,
                share.count
            ),
            interpretation: format!(
                "Reduced {} hiring may reflect funding shifts or completed recruitment drives.",
                share.category
            ),
        })
        .collect()
}

fn staff_ratio_drift(context: &SignalContext<'_>, thresholds: &SignalThresholds) -> Vec<Signal> {
    if context.current.total == 0 || context.historical.total == 0 {
        return Vec::new();
    }
    let drift = context.current.staff_ratio - context.historical.staff_ratio;
    if drift.abs() <= thresholds.staff_ratio_drift_pp {
        return Vec::new();
    }

    let interpretation = if drift > 0.0 {
        "A larger share of staff contracts suggests longer-term capacity building."
    } else {
        "Growing reliance on consultants and service agreements favours flexibility over institutional continuity."
    };
    signal(
        SignalType::StaffRatioDrift,
        Severity::from_excess(
            drift,
            thresholds.staff_ratio_drift_pp,
            thresholds.high_severity_multiple,
        ),
        format!(
            "Staff positions at {:.1}% for {}, {} {:.1}pp on the 12-month baseline",
            context.current.staff_ratio,
            context.subject,
            direction(drift),
            drift.abs()
        ),
        interpretation,
    )
}

fn volume_shift(context: &SignalContext<'_>, thresholds: &SignalThresholds) -> Vec<Signal> {
    if context.previous.total < thresholds.volume_min_previous {
        return Vec::new();
    }
    let change = volume_change(context.current.total, context.previous.total);
    if change.abs() < thresholds.volume_shift_pct {
        return Vec::new();
    }

    let interpretation = if change > 0.0 {
        "A hiring surge of this size usually tracks new funding or emergency response."
    } else {
        "A sharp slowdown may signal budget pressure or a pause between programme cycles."
    };
    signal(
        SignalType::VolumeShift,
        Severity::from_excess(
            change,
            thresholds.volume_shift_pct,
            thresholds.high_severity_multiple,
        ),
        format!(
            "{} posted {} positions, {} {:.0}% on the previous period ({})",
            context.subject,
            context.current.total,
            direction(change),
            change.abs(),
            context.previous.total
        ),
        interpretation,
    )
}

fn category_concentration(
    context: &SignalContext<'_>,
    thresholds: &SignalThresholds,
) -> Vec<Signal> {
    let rise = context.concentration.herfindahl - context.previous_concentration.herfindahl;
    if context.concentration.herfindahl < thresholds.concentration_herfindahl
        || context.previous_concentration.distinct < 3
        || rise < thresholds.concentration_rise
    {
        return Vec::new();
    }

    signal(
        SignalType::CategoryConcentration,
        Severity::from_excess(
            rise,
            thresholds.concentration_rise,
            thresholds.high_severity_multiple,
        ),
        format!(
            "{} hiring is concentrating: top three categories hold {:.0}% of postings (index {:.1}, up {:.1})",
            context.subject, context.concentration.top3_share, context.concentration.herfindahl, rise
        ),
        "Narrowing category focus increases exposure to shifts in a few programme areas.",
    )
}
