//! Declarative sentence selection. Each table is scanned top to bottom and the
//! first rule whose condition holds renders the text; the last rule of every
//! table is unconditional.

pub(crate) struct TemplateRule<C> {
    pub(crate) condition: fn(&C) -> bool,
    pub(crate) render: fn(&C) -> String,
}

pub(crate) fn render_first<C>(rules: &[TemplateRule<C>], facts: &C) -> String {
    rules
        .iter()
        .find(|rule| (rule.condition)(facts))
        .map(|rule| (rule.render)(facts))
        .unwrap_or_default()
}

fn always<C>(_: &C) -> bool {
    true
}

pub(crate) fn sentence_case(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn signed(value: f64) -> String {
    format!("{value:+.1}")
}

/// Facts shared by the percentage-ratio themes (staffing, seniority, field
/// presence).
#[derive(Debug, Clone)]
pub(crate) struct RatioFacts {
    pub(crate) subject: String,
    pub(crate) agency_view: bool,
    pub(crate) benchmark_label: String,
    pub(crate) metric: &'static str,
    pub(crate) current: f64,
    pub(crate) benchmark: f64,
    pub(crate) previous: Option<f64>,
}

impl RatioFacts {
    pub(crate) fn gap(&self) -> f64 {
        self.current - self.benchmark
    }

    pub(crate) fn change(&self) -> f64 {
        self.previous.map_or(0.0, |previous| self.current - previous)
    }

    fn change_dominates(&self) -> bool {
        self.change().abs() > self.gap().abs()
    }

    /// "at UNDP" for one agency, "across the market" otherwise.
    fn scope(&self) -> String {
        if self.agency_view {
            format!("at {}", self.subject)
        } else {
            format!("across {}", self.subject)
        }
    }
}

pub(crate) fn ratio_narrative(facts: &RatioFacts) -> String {
    let mut narrative = format!(
        "{} {} share stands at {:.1}% against {:.1}% for {} ({}pp).",
        sentence_case(&facts.subject),
        facts.metric,
        facts.current,
        facts.benchmark,
        facts.benchmark_label,
        signed(facts.gap())
    );
    if let Some(previous) = facts.previous {
        narrative.push_str(&format!(
            " It moved {}pp from {:.1}% in the previous period.",
            signed(facts.change()),
            previous
        ));
    }
    narrative
}

pub(crate) const STAFFING_HEADLINES: &[TemplateRule<RatioFacts>] = &[
    TemplateRule {
        condition: |f| f.change_dominates() && f.change() < 0.0,
        render: |f| {
            format!(
                "{} staff share fell {:.1}pp to {:.1}%",
                sentence_case(&f.subject),
                f.change().abs(),
                f.current
            )
        },
    },
    TemplateRule {
        condition: |f| f.change_dominates(),
        render: |f| {
            format!(
                "{} staff share rose {:.1}pp to {:.1}%",
                sentence_case(&f.subject),
                f.change(),
                f.current
            )
        },
    },
    TemplateRule {
        condition: |f| f.gap() > 0.0,
        render: |f| {
            format!(
                "{} hires on staff contracts more than {}",
                sentence_case(&f.subject),
                f.benchmark_label
            )
        },
    },
    TemplateRule {
        condition: always,
        render: |f| {
            format!(
                "{} leans on non-staff contracts compared with {}",
                sentence_case(&f.subject),
                f.benchmark_label
            )
        },
    },
];

pub(crate) const STAFFING_IMPLICATIONS: &[TemplateRule<RatioFacts>] = &[
    TemplateRule {
        condition: |f| f.current < f.benchmark.min(f.previous.unwrap_or(f.benchmark)),
        render: |_| {
            "Flexible contracts speed up delivery but put institutional knowledge at risk; review which functions need continuity.".to_string()
        },
    },
    TemplateRule {
        condition: always,
        render: |_| {
            "Commitment to staff positions signals long-term programme investment and longer recruitment cycles.".to_string()
        },
    },
];

pub(crate) const SENIORITY_HEADLINES: &[TemplateRule<RatioFacts>] = &[
    TemplateRule {
        condition: |f| f.change_dominates() && f.change() > 0.0,
        render: |f| {
            format!(
                "Senior hiring {} accelerated by {:.1}pp",
                f.scope(),
                f.change()
            )
        },
    },
    TemplateRule {
        condition: |f| f.change_dominates(),
        render: |f| {
            format!(
                "Senior hiring {} slowed by {:.1}pp",
                f.scope(),
                f.change().abs()
            )
        },
    },
    TemplateRule {
        condition: |f| f.gap() > 0.0,
        render: |f| {
            format!(
                "{} recruits a more senior profile than {}",
                sentence_case(&f.subject),
                f.benchmark_label
            )
        },
    },
    TemplateRule {
        condition: always,
        render: |f| {
            format!(
                "{} recruits a more junior profile than {}",
                sentence_case(&f.subject),
                f.benchmark_label
            )
        },
    },
];

pub(crate) const SENIORITY_IMPLICATIONS: &[TemplateRule<RatioFacts>] = &[
    TemplateRule {
        condition: |f| f.current > f.benchmark,
        render: |_| {
            "Senior searches take longer and draw from a thin pool; plan pipelines ahead of vacancies.".to_string()
        },
    },
    TemplateRule {
        condition: always,
        render: |_| {
            "A junior-heavy intake needs supervision capacity and clear progression paths.".to_string()
        },
    },
];

pub(crate) const FIELD_HEADLINES: &[TemplateRule<RatioFacts>] = &[
    TemplateRule {
        condition: |f| f.change_dominates() && f.change() > 0.0,
        render: |f| {
            format!(
                "{} is moving hiring into the field (+{:.1}pp)",
                sentence_case(&f.subject),
                f.change()
            )
        },
    },
    TemplateRule {
        condition: |f| f.change_dominates(),
        render: |f| {
            format!(
                "{} is pulling hiring back from the field ({:.1}pp)",
                sentence_case(&f.subject),
                f.change()
            )
        },
    },
    TemplateRule {
        condition: |f| f.gap() > 0.0,
        render: |f| {
            format!(
                "{} is more field-based than {}",
                sentence_case(&f.subject),
                f.benchmark_label
            )
        },
    },
    TemplateRule {
        condition: always,
        render: |f| {
            format!(
                "{} concentrates hiring in headquarters and hubs",
                sentence_case(&f.subject)
            )
        },
    },
];

pub(crate) const FIELD_IMPLICATIONS: &[TemplateRule<RatioFacts>] = &[
    TemplateRule {
        condition: |f| f.current > f.benchmark,
        render: |_| {
            "Field-heavy recruitment depends on hardship incentives and rotation planning.".to_string()
        },
    },
    TemplateRule {
        condition: always,
        render: |_| {
            "Central hiring competes directly with other agencies for the same duty-station talent.".to_string()
        },
    },
];

#[derive(Debug, Clone)]
pub(crate) struct WindowFacts {
    pub(crate) subject: String,
    pub(crate) benchmark_label: String,
    pub(crate) average: f64,
    pub(crate) benchmark_average: f64,
    pub(crate) short_share: f64,
    pub(crate) benchmark_short_share: f64,
}

impl WindowFacts {
    pub(crate) fn gap_days(&self) -> f64 {
        self.average - self.benchmark_average
    }

    pub(crate) fn short_gap(&self) -> f64 {
        self.short_share - self.benchmark_short_share
    }
}

pub(crate) const WINDOW_HEADLINES: &[TemplateRule<WindowFacts>] = &[
    TemplateRule {
        condition: |f| f.gap_days() < 0.0,
        render: |f| {
            format!(
                "{} closes postings {:.1} days faster than {}",
                sentence_case(&f.subject),
                f.gap_days().abs(),
                f.benchmark_label
            )
        },
    },
    TemplateRule {
        condition: always,
        render: |f| {
            format!(
                "{} keeps postings open {:.1} days longer than {}",
                sentence_case(&f.subject),
                f.gap_days(),
                f.benchmark_label
            )
        },
    },
];

pub(crate) fn window_narrative(facts: &WindowFacts) -> String {
    format!(
        "Postings stay open {:.1} days on average against {:.1} for {}; {:.1}% close within 10 days ({}pp).",
        facts.average,
        facts.benchmark_average,
        facts.benchmark_label,
        facts.short_share,
        signed(facts.short_gap())
    )
}

pub(crate) const WINDOW_IMPLICATIONS: &[TemplateRule<WindowFacts>] = &[
    TemplateRule {
        condition: |f| f.gap_days() < 0.0,
        render: |_| {
            "Compressed windows favour candidates already in the pipeline and reduce applicant diversity.".to_string()
        },
    },
    TemplateRule {
        condition: always,
        render: |_| {
            "Longer windows broaden reach but slow time-to-hire.".to_string()
        },
    },
];

#[derive(Debug, Clone)]
pub(crate) struct CategoryFacts {
    pub(crate) subject: String,
    pub(crate) category: String,
    pub(crate) count: usize,
    pub(crate) previous: usize,
    pub(crate) growth: f64,
}

pub(crate) const CATEGORY_HEADLINES: &[TemplateRule<CategoryFacts>] = &[
    TemplateRule {
        condition: |f| f.previous == 0,
        render: |f| format!("{} emerged as a new hiring focus", f.category),
    },
    TemplateRule {
        condition: |f| f.count == 0,
        render: |f| format!("{} hiring stopped this period", f.category),
    },
    TemplateRule {
        condition: |f| f.growth > 0.0,
        render: |f| format!("{} hiring expanded {:.0}%", f.category, f.growth),
    },
    TemplateRule {
        condition: always,
        render: |f| format!("{} hiring contracted {:.0}%", f.category, f.growth.abs()),
    },
];

pub(crate) fn category_narrative(facts: &CategoryFacts) -> String {
    format!(
        "{} posted {} {} positions this period against {} in the previous period.",
        sentence_case(&facts.subject),
        facts.count,
        facts.category,
        facts.previous
    )
}

pub(crate) const CATEGORY_IMPLICATIONS: &[TemplateRule<CategoryFacts>] = &[
    TemplateRule {
        condition: |f| f.count > f.previous,
        render: |f| {
            format!(
                "Expect tighter competition for {} profiles as demand builds.",
                f.category
            )
        },
    },
    TemplateRule {
        condition: always,
        render: |f| {
            format!(
                "Experienced {} candidates may become easier to reach while demand eases.",
                f.category
            )
        },
    },
];

#[derive(Debug, Clone)]
pub(crate) struct SimilarityFacts {
    pub(crate) agency_view: bool,
    pub(crate) agency_a: String,
    pub(crate) agency_b: String,
    pub(crate) coefficient: f64,
    pub(crate) overlap_label: &'static str,
}

pub(crate) const SIMILARITY_HEADLINES: &[TemplateRule<SimilarityFacts>] = &[
    TemplateRule {
        condition: |f| f.agency_view,
        render: |f| format!("{} hires for the same profiles as {}", f.agency_a, f.agency_b),
    },
    TemplateRule {
        condition: always,
        render: |f| format!("{} and {} compete for the same talent", f.agency_a, f.agency_b),
    },
];

pub(crate) fn similarity_narrative(facts: &SimilarityFacts) -> String {
    format!(
        "Category mixes of {} and {} correlate at {:.2}, which indicates {}.",
        facts.agency_a, facts.agency_b, facts.coefficient, facts.overlap_label
    )
}

pub(crate) const SIMILARITY_IMPLICATIONS: &[TemplateRule<SimilarityFacts>] = &[
    TemplateRule {
        condition: |f| f.agency_view,
        render: |f| {
            format!(
                "Benchmark offers and timelines against {}; candidates will weigh both.",
                f.agency_b
            )
        },
    },
    TemplateRule {
        condition: always,
        render: |_| {
            "Overlapping demand raises the cost of shared profiles across the system.".to_string()
        },
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn staffing(current: f64, benchmark: f64, previous: Option<f64>) -> RatioFacts {
        RatioFacts {
            subject: "UNDP".to_string(),
            agency_view: true,
            benchmark_label: "the market".to_string(),
            metric: "staff",
            current,
            benchmark,
            previous,
        }
    }

    #[test]
    fn first_matching_rule_wins() {
        let falling = staffing(20.0, 25.0, Some(50.0));
        assert_eq!(
            render_first(STAFFING_HEADLINES, &falling),
            "UNDP staff share fell 30.0pp to 20.0%"
        );

        let above = staffing(60.0, 40.0, Some(55.0));
        assert_eq!(
            render_first(STAFFING_HEADLINES, &above),
            "UNDP hires on staff contracts more than the market"
        );

        let below = staffing(20.0, 40.0, None);
        assert!(render_first(STAFFING_HEADLINES, &below).contains("non-staff"));
    }

    #[test]
    fn narratives_capitalise_the_subject() {
        let facts = RatioFacts {
            subject: "the market".to_string(),
            agency_view: false,
            benchmark_label: "the 12-month baseline".to_string(),
            ..staffing(35.0, 30.0, Some(32.0))
        };
        let narrative = ratio_narrative(&facts);
        assert!(narrative.starts_with("The market staff share stands at 35.0%"));
        assert!(narrative.contains("(+5.0pp)"));
        assert!(narrative.contains("moved +3.0pp from 32.0%"));
    }

    #[test]
    fn seniority_headlines_read_naturally_in_both_views() {
        let agency = RatioFacts {
            metric: "senior",
            ..staffing(30.0, 24.0, Some(20.0))
        };
        assert_eq!(
            render_first(SENIORITY_HEADLINES, &agency),
            "Senior hiring at UNDP accelerated by 10.0pp"
        );

        let market = RatioFacts {
            subject: "the market".to_string(),
            agency_view: false,
            ..agency.clone()
        };
        assert_eq!(
            render_first(SENIORITY_HEADLINES, &market),
            "Senior hiring across the market accelerated by 10.0pp"
        );

        let slowing = RatioFacts {
            previous: Some(40.0),
            ..market
        };
        assert_eq!(
            render_first(SENIORITY_HEADLINES, &slowing),
            "Senior hiring across the market slowed by 10.0pp"
        );
    }

    #[test]
    fn category_templates_cover_entry_and_exit() {
        let facts = |count, previous, growth| CategoryFacts {
            subject: "WFP".to_string(),
            category: "Logistics".to_string(),
            count,
            previous,
            growth,
        };
        assert_eq!(
            render_first(CATEGORY_HEADLINES, &facts(12, 0, 100.0)),
            "Logistics emerged as a new hiring focus"
        );
        assert_eq!(
            render_first(CATEGORY_HEADLINES, &facts(0, 8, -100.0)),
            "Logistics hiring stopped this period"
        );
        assert_eq!(
            render_first(CATEGORY_HEADLINES, &facts(6, 10, -40.0)),
            "Logistics hiring contracted 40%"
        );
    }

    #[test]
    fn sentence_case_handles_empty_input() {
        assert_eq!(sentence_case(""), "");
        assert_eq!(sentence_case("the market"), "The market");
    }
}
