mod rules;

use rules::{GradeInput, GRADE_RULES};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeTier {
    Executive,
    Director,
    SeniorProfessional,
    MidProfessional,
    EntryProfessional,
    Support,
    Consultant,
    Intern,
    Other,
}

impl GradeTier {
    pub const fn ordered() -> [Self; 9] {
        [
            Self::Executive,
            Self::Director,
            Self::SeniorProfessional,
            Self::MidProfessional,
            Self::EntryProfessional,
            Self::Support,
            Self::Consultant,
            Self::Intern,
            Self::Other,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Executive => "Executive",
            Self::Director => "Director",
            Self::SeniorProfessional => "Senior Professional",
            Self::MidProfessional => "Mid Professional",
            Self::EntryProfessional => "Entry Professional",
            Self::Support => "Support",
            Self::Consultant => "Consultant",
            Self::Intern => "Intern",
            Self::Other => "Other",
        }
    }

    pub const fn is_senior(self) -> bool {
        matches!(
            self,
            Self::Executive | Self::Director | Self::SeniorProfessional
        )
    }

    pub const fn consolidated(self) -> ConsolidatedTier {
        match self {
            Self::Executive | Self::Director | Self::SeniorProfessional => {
                ConsolidatedTier::Senior
            }
            Self::MidProfessional => ConsolidatedTier::Mid,
            Self::EntryProfessional | Self::Intern => ConsolidatedTier::Entry,
            Self::Support => ConsolidatedTier::Support,
            Self::Consultant | Self::Other => ConsolidatedTier::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffCategory {
    Staff,
    NonStaff,
}

impl StaffCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Staff => "Staff",
            Self::NonStaff => "Non-Staff",
        }
    }
}

/// Coarse seniority buckets used for workforce pyramid analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsolidatedTier {
    Senior,
    Mid,
    Entry,
    Support,
    Other,
}

impl ConsolidatedTier {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Senior,
            Self::Mid,
            Self::Entry,
            Self::Support,
            Self::Other,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Senior => "Senior",
            Self::Mid => "Mid-level",
            Self::Entry => "Entry-level",
            Self::Support => "Support",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeFamily {
    SeniorLeadership,
    InternationalProfessional,
    NationalOfficer,
    GeneralService,
    FieldService,
    PersonnelServiceAgreement,
    IndividualContractor,
    ServiceContract,
    Consultancy,
    Volunteer,
    Internship,
    Temporary,
    Unclassified,
}

impl GradeFamily {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SeniorLeadership => "Senior Leadership",
            Self::InternationalProfessional => "International Professional",
            Self::NationalOfficer => "National Officer",
            Self::GeneralService => "General Service",
            Self::FieldService => "Field Service",
            Self::PersonnelServiceAgreement => "Personnel Service Agreement",
            Self::IndividualContractor => "Individual Contractor",
            Self::ServiceContract => "Service Contract",
            Self::Consultancy => "Consultancy",
            Self::Volunteer => "Volunteer",
            Self::Internship => "Internship",
            Self::Temporary => "Temporary",
            Self::Unclassified => "Unclassified",
        }
    }
}

pub const FALLBACK_RULE: &str = "unclassified";

/// Seniority and contract classification derived from a raw grade code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GradeClassification {
    pub tier: GradeTier,
    pub staff_category: StaffCategory,
    pub consolidated_tier: ConsolidatedTier,
    pub family: GradeFamily,
    pub rule: &'static str,
}

impl GradeClassification {
    fn new(
        tier: GradeTier,
        staff_category: StaffCategory,
        family: GradeFamily,
        rule: &'static str,
    ) -> Self {
        Self {
            tier,
            staff_category,
            consolidated_tier: tier.consolidated(),
            family,
            rule,
        }
    }

    pub fn is_staff(&self) -> bool {
        self.staff_category == StaffCategory::Staff
    }
}

/// Classifies a grade code against the ordered rule table. Never fails:
/// anything unrecognized lands in [`GradeTier::Other`].
pub fn classify(grade_code: &str) -> GradeClassification {
    let input = GradeInput::new(grade_code);

    GRADE_RULES
        .iter()
        .find_map(|rule| {
            rule.apply(&input).map(|(tier, staff_category, family)| {
                GradeClassification::new(tier, staff_category, family, rule.name)
            })
        })
        .unwrap_or_else(|| {
            GradeClassification::new(
                GradeTier::Other,
                StaffCategory::NonStaff,
                GradeFamily::Unclassified,
                FALLBACK_RULE,
            )
        })
}

/// Memoizes classifications per distinct code for the lifetime of one
/// analysis run.
#[derive(Debug, Default)]
pub struct GradeClassifier {
    cache: HashMap<String, GradeClassification>,
}

impl GradeClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classify(&mut self, grade_code: &str) -> GradeClassification {
        if let Some(hit) = self.cache.get(grade_code) {
            return *hit;
        }

        let classification = classify(grade_code);
        self.cache.insert(grade_code.to_string(), classification);
        classification
    }

    pub fn distinct_codes(&self) -> usize {
        self.cache.len()
    }
}
