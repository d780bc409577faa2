use super::{GradeFamily, GradeTier, StaffCategory};

/// Grade text prepared once per lookup so each rule only compares strings.
#[derive(Debug)]
pub(crate) struct GradeInput {
    /// Lowercased words of the raw text, split on anything non-alphanumeric.
    pub(crate) words: Vec<String>,
    /// Code candidates in text order: every token with separators removed and
    /// uppercased, then each adjacent token pair joined (`NO B` gives `NOB`),
    /// then the whole text compacted.
    pub(crate) codes: Vec<String>,
}

impl GradeInput {
    pub(crate) fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        let words = trimmed
            .to_lowercase()
            .split(|ch: char| !ch.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .map(str::to_string)
            .collect();

        let tokens: Vec<String> = trimmed
            .split(|ch: char| {
                ch.is_whitespace() || matches!(ch, ',' | '(' | ')' | '[' | ']' | '/' | ';' | ':')
            })
            .map(compact_code)
            .filter(|token| !token.is_empty())
            .collect();

        let mut codes: Vec<String> = Vec::with_capacity(tokens.len() * 2 + 1);
        let pairs = tokens.windows(2).map(|pair| format!("{}{}", pair[0], pair[1]));
        for code in tokens.iter().cloned().chain(pairs).chain([compact_code(trimmed)]) {
            if !code.is_empty() && !codes.contains(&code) {
                codes.push(code);
            }
        }

        Self { words, codes }
    }

    fn candidates(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }
}

fn compact_code(raw: &str) -> String {
    raw.chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_uppercase())
        .collect()
}

/// Splits `P12` style codes into their numeric level when `prefix` matches
/// and nothing but digits follows it.
fn numeric_level(candidate: &str, prefix: &str) -> Option<u8> {
    let rest = candidate.strip_prefix(prefix)?;
    if rest.is_empty() || !rest.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok()
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum GradePattern {
    /// Any lowercased word of the raw text equals one of these.
    Keyword(&'static [&'static str]),
    /// The normalized code equals one of these.
    Exact(&'static [&'static str]),
    /// `prefix` followed by a numeric level inside `min..=max`.
    Graded {
        prefix: &'static str,
        min: u8,
        max: u8,
    },
    /// `prefix` followed by any numeric level; the outcome maps the level.
    Leveled { prefix: &'static str },
}

impl GradePattern {
    /// Returns the embedded numeric level (0 when the pattern carries none).
    pub(crate) fn matches(&self, input: &GradeInput) -> Option<u8> {
        match *self {
            GradePattern::Keyword(keywords) => input
                .words
                .iter()
                .any(|word| keywords.contains(&word.as_str()))
                .then_some(0),
            GradePattern::Exact(codes) => input
                .candidates()
                .any(|candidate| codes.contains(&candidate))
                .then_some(0),
            GradePattern::Graded { prefix, min, max } => input
                .candidates()
                .filter_map(|candidate| numeric_level(candidate, prefix))
                .find(|level| (min..=max).contains(level)),
            GradePattern::Leveled { prefix } => input
                .candidates()
                .find_map(|candidate| numeric_level(candidate, prefix)),
        }
    }
}

/// Numeric cut-offs for contractor families whose code embeds a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LevelScale {
    pub(crate) senior_from: u8,
    pub(crate) mid_from: u8,
}

impl LevelScale {
    pub(crate) const STANDARD: Self = Self {
        senior_from: 10,
        mid_from: 7,
    };
    pub(crate) const INDIVIDUAL_CONTRACTOR: Self = Self {
        senior_from: 3,
        mid_from: 2,
    };
    pub(crate) const SPECIAL_SERVICE: Self = Self {
        senior_from: 4,
        mid_from: 3,
    };

    pub(crate) fn tier_for(self, level: u8) -> GradeTier {
        if level >= self.senior_from {
            GradeTier::SeniorProfessional
        } else if level >= self.mid_from {
            GradeTier::MidProfessional
        } else {
            GradeTier::EntryProfessional
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum RuleOutcome {
    Fixed {
        tier: GradeTier,
        staff_category: StaffCategory,
        family: GradeFamily,
    },
    Leveled {
        scale: LevelScale,
        staff_category: StaffCategory,
        family: GradeFamily,
    },
}

impl RuleOutcome {
    pub(crate) fn resolve(self, level: u8) -> (GradeTier, StaffCategory, GradeFamily) {
        match self {
            RuleOutcome::Fixed {
                tier,
                staff_category,
                family,
            } => (tier, staff_category, family),
            RuleOutcome::Leveled {
                scale,
                staff_category,
                family,
            } => (scale.tier_for(level), staff_category, family),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct GradeRule {
    pub(crate) name: &'static str,
    pub(crate) pattern: GradePattern,
    pub(crate) outcome: RuleOutcome,
}

impl GradeRule {
    pub(crate) fn apply(&self, input: &GradeInput) -> Option<(GradeTier, StaffCategory, GradeFamily)> {
        self.pattern
            .matches(input)
            .map(|level| self.outcome.resolve(level))
    }
}

const fn fixed(
    name: &'static str,
    pattern: GradePattern,
    tier: GradeTier,
    staff_category: StaffCategory,
    family: GradeFamily,
) -> GradeRule {
    GradeRule {
        name,
        pattern,
        outcome: RuleOutcome::Fixed {
            tier,
            staff_category,
            family,
        },
    }
}

const fn leveled(
    name: &'static str,
    prefix: &'static str,
    scale: LevelScale,
    family: GradeFamily,
) -> GradeRule {
    GradeRule {
        name,
        pattern: GradePattern::Leveled { prefix },
        outcome: RuleOutcome::Leveled {
            scale,
            staff_category: StaffCategory::NonStaff,
            family,
        },
    }
}

const fn graded(
    name: &'static str,
    prefix: &'static str,
    min: u8,
    max: u8,
    tier: GradeTier,
    family: GradeFamily,
) -> GradeRule {
    fixed(
        name,
        GradePattern::Graded { prefix, min, max },
        tier,
        StaffCategory::Staff,
        family,
    )
}

/// Ordered grade taxonomy; the first matching rule wins.
///
/// Keyword families come first so free text such as "Intern (P-1 level)" or
/// "IICA-2 consultant" is not claimed by the code that happens to be embedded.
/// Leadership and director codes precede professional codes.
pub(crate) const GRADE_RULES: &[GradeRule] = &[
    fixed(
        "internship",
        GradePattern::Keyword(&["intern", "interns", "internship", "internships"]),
        GradeTier::Intern,
        StaffCategory::NonStaff,
        GradeFamily::Internship,
    ),
    fixed(
        "volunteer",
        GradePattern::Keyword(&["unv", "volunteer", "volunteers"]),
        GradeTier::Other,
        StaffCategory::NonStaff,
        GradeFamily::Volunteer,
    ),
    leveled(
        "international_psa",
        "IPSA",
        LevelScale::STANDARD,
        GradeFamily::PersonnelServiceAgreement,
    ),
    leveled(
        "national_psa",
        "NPSA",
        LevelScale::STANDARD,
        GradeFamily::PersonnelServiceAgreement,
    ),
    leveled(
        "local_individual_contractor",
        "LICA",
        LevelScale::STANDARD,
        GradeFamily::IndividualContractor,
    ),
    leveled(
        "international_individual_contractor",
        "IICA",
        LevelScale::INDIVIDUAL_CONTRACTOR,
        GradeFamily::IndividualContractor,
    ),
    leveled(
        "service_contract",
        "SC",
        LevelScale::STANDARD,
        GradeFamily::ServiceContract,
    ),
    leveled(
        "special_service_agreement",
        "SB",
        LevelScale::SPECIAL_SERVICE,
        GradeFamily::ServiceContract,
    ),
    fixed(
        "consultancy_keyword",
        GradePattern::Keyword(&["consultant", "consultants", "consultancy", "consulting"]),
        GradeTier::Consultant,
        StaffCategory::NonStaff,
        GradeFamily::Consultancy,
    ),
    fixed(
        "consultancy_code",
        GradePattern::Exact(&["IC", "CONS", "SSA"]),
        GradeTier::Consultant,
        StaffCategory::NonStaff,
        GradeFamily::Consultancy,
    ),
    fixed(
        "senior_leadership",
        GradePattern::Exact(&["USG", "ASG", "DSG", "SG"]),
        GradeTier::Executive,
        StaffCategory::Staff,
        GradeFamily::SeniorLeadership,
    ),
    graded(
        "director",
        "D",
        1,
        2,
        GradeTier::Director,
        GradeFamily::InternationalProfessional,
    ),
    graded(
        "senior_professional",
        "P",
        5,
        6,
        GradeTier::SeniorProfessional,
        GradeFamily::InternationalProfessional,
    ),
    graded(
        "mid_professional",
        "P",
        3,
        4,
        GradeTier::MidProfessional,
        GradeFamily::InternationalProfessional,
    ),
    graded(
        "entry_professional",
        "P",
        1,
        2,
        GradeTier::EntryProfessional,
        GradeFamily::InternationalProfessional,
    ),
    fixed(
        "junior_professional_officer",
        GradePattern::Exact(&["JPO"]),
        GradeTier::EntryProfessional,
        StaffCategory::NonStaff,
        GradeFamily::InternationalProfessional,
    ),
    fixed(
        "national_officer_senior",
        GradePattern::Exact(&["NOD", "NOE"]),
        GradeTier::SeniorProfessional,
        StaffCategory::Staff,
        GradeFamily::NationalOfficer,
    ),
    fixed(
        "national_officer_mid",
        GradePattern::Exact(&["NOC"]),
        GradeTier::MidProfessional,
        StaffCategory::Staff,
        GradeFamily::NationalOfficer,
    ),
    fixed(
        "national_officer_entry",
        GradePattern::Exact(&["NOA", "NOB"]),
        GradeTier::EntryProfessional,
        StaffCategory::Staff,
        GradeFamily::NationalOfficer,
    ),
    graded(
        "field_service",
        "FS",
        1,
        7,
        GradeTier::Support,
        GradeFamily::FieldService,
    ),
    graded(
        "general_service",
        "GS",
        1,
        7,
        GradeTier::Support,
        GradeFamily::GeneralService,
    ),
    graded(
        "general_service_short",
        "G",
        1,
        7,
        GradeTier::Support,
        GradeFamily::GeneralService,
    ),
    fixed(
        "temporary_keyword",
        GradePattern::Keyword(&["temporary", "temp"]),
        GradeTier::Other,
        StaffCategory::NonStaff,
        GradeFamily::Temporary,
    ),
    fixed(
        "temporary_code",
        GradePattern::Exact(&["TA", "TJO"]),
        GradeTier::Other,
        StaffCategory::NonStaff,
        GradeFamily::Temporary,
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str) -> &'static GradeRule {
        GRADE_RULES
            .iter()
            .find(|rule| rule.name == name)
            .expect("rule exists")
    }

    #[test]
    fn rule_names_are_unique() {
        let mut names: Vec<_> = GRADE_RULES.iter().map(|rule| rule.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), GRADE_RULES.len());
    }

    #[test]
    fn input_normalization_strips_separators() {
        let input = GradeInput::new("  p-4, Programme Specialist ");
        assert_eq!(
            input.codes,
            vec![
                "P4",
                "PROGRAMME",
                "SPECIALIST",
                "P4PROGRAMME",
                "PROGRAMMESPECIALIST",
                "P4PROGRAMMESPECIALIST",
            ]
        );

        let spaced = GradeInput::new("NO B");
        assert_eq!(spaced.codes, vec!["NO", "B", "NOB"]);

        let trailing = GradeInput::new("Programme Specialist (P-4)");
        assert!(trailing.codes.iter().any(|code| code == "P4"));
    }

    #[test]
    fn graded_pattern_respects_level_range() {
        let director = rule("director");
        assert!(director.apply(&GradeInput::new("D-1")).is_some());
        assert!(director.apply(&GradeInput::new("D-3")).is_none());
        assert!(director.apply(&GradeInput::new("DSG")).is_none());
    }

    #[test]
    fn general_service_short_prefix_ignores_gs_codes() {
        let short = rule("general_service_short");
        assert!(short.apply(&GradeInput::new("G-5")).is_some());
        assert!(short.apply(&GradeInput::new("GS-5")).is_none());
    }

    #[test]
    fn leveled_outcome_uses_scale_thresholds() {
        let npsa = rule("national_psa");
        let tier_of = |code: &str| npsa.apply(&GradeInput::new(code)).map(|(tier, _, _)| tier);
        assert_eq!(tier_of("NPSA-11"), Some(GradeTier::SeniorProfessional));
        assert_eq!(tier_of("NPSA-10"), Some(GradeTier::SeniorProfessional));
        assert_eq!(tier_of("NPSA-9"), Some(GradeTier::MidProfessional));
        assert_eq!(tier_of("NPSA-7"), Some(GradeTier::MidProfessional));
        assert_eq!(tier_of("NPSA-6"), Some(GradeTier::EntryProfessional));
        assert_eq!(tier_of("NPSA"), None);
    }

    #[test]
    fn keyword_pattern_matches_whole_words_only() {
        let intern = rule("internship");
        assert!(intern.apply(&GradeInput::new("Internship")).is_some());
        assert!(intern
            .apply(&GradeInput::new("International Consultant"))
            .is_none());
    }

    #[test]
    fn scale_boundaries() {
        assert_eq!(
            LevelScale::INDIVIDUAL_CONTRACTOR.tier_for(3),
            GradeTier::SeniorProfessional
        );
        assert_eq!(
            LevelScale::INDIVIDUAL_CONTRACTOR.tier_for(2),
            GradeTier::MidProfessional
        );
        assert_eq!(
            LevelScale::SPECIAL_SERVICE.tier_for(2),
            GradeTier::EntryProfessional
        );
    }
}
