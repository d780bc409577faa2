use super::super::grades::{ConsolidatedTier, GradeTier};
use super::{percentage, EnrichedRecord};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub count: usize,
    pub percentage: f64,
    pub previous_count: usize,
    pub growth_rate: f64,
}

/// Period-over-period growth in percent. New activity from nothing is
/// reported as +100% rather than an infinite rate.
pub fn growth_rate(current: usize, previous: usize) -> f64 {
    match (current, previous) {
        (0, 0) => 0.0,
        (_, 0) => 100.0,
        _ => (current as f64 - previous as f64) * 100.0 / previous as f64,
    }
}

pub(crate) fn count_by<'a, F>(records: &[EnrichedRecord<'a>], key: F) -> BTreeMap<&'a str, usize>
where
    F: Fn(&EnrichedRecord<'a>) -> &'a str,
{
    let mut counts = BTreeMap::new();
    for entry in records {
        *counts.entry(key(entry)).or_insert(0) += 1;
    }
    counts
}

/// Category counts over the union of both slices, largest first.
pub fn category_distribution(
    current: &[EnrichedRecord<'_>],
    previous: &[EnrichedRecord<'_>],
) -> Vec<CategoryShare> {
    let current_counts = count_by(current, |entry| entry.category());
    let previous_counts = count_by(previous, |entry| entry.category());

    let mut shares: Vec<CategoryShare> = current_counts
        .keys()
        .chain(previous_counts.keys())
        .copied()
        .collect::<std::collections::BTreeSet<&str>>()
        .into_iter()
        .map(|category| {
            let count = current_counts.get(category).copied().unwrap_or(0);
            let previous_count = previous_counts.get(category).copied().unwrap_or(0);
            CategoryShare {
                category: category.to_string(),
                count,
                percentage: percentage(count, current.len()),
                previous_count,
                growth_rate: growth_rate(count, previous_count),
            }
        })
        .collect();

    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
    shares
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcentrationLevel {
    Concentrated,
    Moderate,
    Diversified,
}

impl ConcentrationLevel {
    const CONCENTRATED_FROM: f64 = 25.0;
    const MODERATE_FROM: f64 = 15.0;

    pub fn from_herfindahl(herfindahl: f64) -> Self {
        if herfindahl >= Self::CONCENTRATED_FROM {
            Self::Concentrated
        } else if herfindahl >= Self::MODERATE_FROM {
            Self::Moderate
        } else {
            Self::Diversified
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Concentrated => "highly concentrated",
            Self::Moderate => "moderately concentrated",
            Self::Diversified => "diversified",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConcentrationIndex {
    pub distinct: usize,
    pub top3_share: f64,
    /// Sum of squared fractional shares, scaled to 0-100.
    pub herfindahl: f64,
    pub level: ConcentrationLevel,
}

pub fn concentration_index<I>(counts: I) -> ConcentrationIndex
where
    I: IntoIterator<Item = usize>,
{
    let mut counts: Vec<usize> = counts.into_iter().filter(|count| *count > 0).collect();
    let total: usize = counts.iter().sum();
    counts.sort_unstable_by(|a, b| b.cmp(a));

    let herfindahl = if total == 0 {
        0.0
    } else {
        counts
            .iter()
            .map(|count| {
                let share = *count as f64 / total as f64;
                share * share
            })
            .sum::<f64>()
            * 100.0
    };

    ConcentrationIndex {
        distinct: counts.len(),
        top3_share: percentage(counts.iter().take(3).sum(), total),
        herfindahl,
        level: if total == 0 {
            ConcentrationLevel::Diversified
        } else {
            ConcentrationLevel::from_herfindahl(herfindahl)
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierShare {
    pub tier: GradeTier,
    pub label: &'static str,
    pub count: usize,
    pub percentage: f64,
}

pub fn tier_distribution(records: &[EnrichedRecord<'_>]) -> Vec<TierShare> {
    GradeTier::ordered()
        .into_iter()
        .map(|tier| {
            let count = records
                .iter()
                .filter(|entry| entry.grade.tier == tier)
                .count();
            TierShare {
                tier,
                label: tier.label(),
                count,
                percentage: percentage(count, records.len()),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidatedShare {
    pub tier: ConsolidatedTier,
    pub label: &'static str,
    pub count: usize,
    pub percentage: f64,
}

pub fn consolidated_distribution(records: &[EnrichedRecord<'_>]) -> Vec<ConsolidatedShare> {
    ConsolidatedTier::ordered()
        .into_iter()
        .map(|tier| {
            let count = records
                .iter()
                .filter(|entry| entry.grade.consolidated_tier == tier)
                .count();
            ConsolidatedShare {
                tier,
                label: tier.label(),
                count,
                percentage: percentage(count, records.len()),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PyramidShape {
    Pyramid,
    Diamond,
    Inverted,
    Flat,
    Undetermined,
}

impl PyramidShape {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pyramid => "classic pyramid",
            Self::Diamond => "diamond",
            Self::Inverted => "inverted pyramid",
            Self::Flat => "flat",
            Self::Undetermined => "undetermined",
        }
    }
}

/// Shape of the seniority structure. Entry and support grades form the base.
pub fn pyramid_shape(distribution: &[ConsolidatedShare]) -> PyramidShape {
    let share_of = |tier: ConsolidatedTier| {
        distribution
            .iter()
            .find(|share| share.tier == tier)
            .map_or(0.0, |share| share.percentage)
    };
    let senior = share_of(ConsolidatedTier::Senior);
    let mid = share_of(ConsolidatedTier::Mid);
    let base = share_of(ConsolidatedTier::Entry) + share_of(ConsolidatedTier::Support);

    if senior + mid + base == 0.0 {
        PyramidShape::Undetermined
    } else if base > mid && mid > senior {
        PyramidShape::Pyramid
    } else if mid > base && mid > senior {
        PyramidShape::Diamond
    } else if senior > base {
        PyramidShape::Inverted
    } else {
        PyramidShape::Flat
    }
}
