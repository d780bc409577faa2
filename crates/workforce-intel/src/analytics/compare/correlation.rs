use super::super::config::ComparisonConfig;
use super::super::metrics::EnrichedRecord;
use super::AgencyProfile;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Pearson correlation coefficient. Degenerate input (fewer than two points,
/// mismatched lengths or a constant series) yields 0.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len();
    if n < 2 || n != b.len() {
        return 0.0;
    }

    let mean_a = a.iter().sum::<f64>() / n as f64;
    let mean_b = b.iter().sum::<f64>() / n as f64;

    let (mut covariance, mut variance_a, mut variance_b) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        covariance += dx * dy;
        variance_a += dx * dx;
        variance_b += dy * dy;
    }

    let denominator = (variance_a * variance_b).sqrt();
    if denominator <= f64::EPSILON {
        return 0.0;
    }
    (covariance / denominator).clamp(-1.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapLevel {
    Strong,
    Moderate,
    Some,
}

impl OverlapLevel {
    pub fn from_coefficient(coefficient: f64, config: &ComparisonConfig) -> Option<Self> {
        if coefficient > config.strong_overlap {
            Some(Self::Strong)
        } else if coefficient > config.moderate_overlap {
            Some(Self::Moderate)
        } else if coefficient > config.some_overlap {
            Some(Self::Some)
        } else {
            None
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Strong => "strong overlap",
            Self::Moderate => "moderate overlap",
            Self::Some => "some overlap",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgencyCorrelation {
    pub agency_a: String,
    pub agency_b: String,
    pub coefficient: f64,
    pub overlap: OverlapLevel,
    pub overlap_label: &'static str,
}

type ShareVector<'a> = BTreeMap<&'a str, f64>;

fn category_shares<'a>(records: &[EnrichedRecord<'a>]) -> BTreeMap<&'a str, ShareVector<'a>> {
    let mut counts: BTreeMap<&'a str, BTreeMap<&'a str, usize>> = BTreeMap::new();
    for entry in records {
        *counts
            .entry(entry.agency())
            .or_default()
            .entry(entry.category())
            .or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(agency, categories)| {
            let total: usize = categories.values().sum();
            let shares = categories
                .into_iter()
                .map(|(category, count)| (category, count as f64 / total as f64))
                .collect();
            (agency, shares)
        })
        .collect()
}

/// Correlates two share vectors zero-filled over the union of their
/// categories.
fn correlate(a: &ShareVector<'_>, b: &ShareVector<'_>) -> f64 {
    let union: BTreeSet<&str> = a.keys().chain(b.keys()).copied().collect();
    let left: Vec<f64> = union
        .iter()
        .map(|category| a.get(category).copied().unwrap_or(0.0))
        .collect();
    let right: Vec<f64> = union
        .iter()
        .map(|category| b.get(category).copied().unwrap_or(0.0))
        .collect();
    pearson(&left, &right)
}

fn build(
    agency_a: &str,
    agency_b: &str,
    coefficient: f64,
    config: &ComparisonConfig,
) -> Option<AgencyCorrelation> {
    OverlapLevel::from_coefficient(coefficient, config).map(|overlap| AgencyCorrelation {
        agency_a: agency_a.to_string(),
        agency_b: agency_b.to_string(),
        coefficient,
        overlap,
        overlap_label: overlap.label(),
    })
}

fn sort_by_strength(correlations: &mut [AgencyCorrelation]) {
    correlations.sort_by(|a, b| {
        b.coefficient
            .total_cmp(&a.coefficient)
            .then_with(|| a.agency_a.cmp(&b.agency_a))
            .then_with(|| a.agency_b.cmp(&b.agency_b))
    });
}

/// Pairwise hiring-pattern overlap among the `top_k` largest agencies.
/// Pairs below the weakest overlap band are omitted.
pub fn hiring_correlations(
    profiles: &[AgencyProfile],
    market: &[EnrichedRecord<'_>],
    config: &ComparisonConfig,
) -> Vec<AgencyCorrelation> {
    let shares = category_shares(market);
    let leaders: Vec<&str> = profiles
        .iter()
        .take(config.top_k)
        .map(|profile| profile.agency.as_str())
        .collect();

    let mut correlations = Vec::new();
    for (index, agency_a) in leaders.iter().enumerate() {
        for agency_b in &leaders[index + 1..] {
            let (Some(a), Some(b)) = (shares.get(agency_a), shares.get(agency_b)) else {
                continue;
            };
            if let Some(correlation) = build(agency_a, agency_b, correlate(a, b), config) {
                correlations.push(correlation);
            }
        }
    }

    sort_by_strength(&mut correlations);
    correlations
}

/// Agencies among the `top_k` largest whose category mix overlaps with
/// `target`. The target itself need not be in the top K.
pub fn similar_agencies(
    target: &str,
    profiles: &[AgencyProfile],
    market: &[EnrichedRecord<'_>],
    config: &ComparisonConfig,
) -> Vec<AgencyCorrelation> {
    let shares = category_shares(market);
    let Some(target_shares) = shares.get(target) else {
        return Vec::new();
    };

    let mut correlations: Vec<AgencyCorrelation> = profiles
        .iter()
        .filter(|profile| profile.agency != target)
        .take(config.top_k)
        .filter_map(|profile| {
            let peer = shares.get(profile.agency.as_str())?;
            build(target, &profile.agency, correlate(target_shares, peer), config)
        })
        .collect();

    sort_by_strength(&mut correlations);
    correlations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pearson_is_symmetric_and_reflexive() {
        let a = [0.5, 0.3, 0.2, 0.0];
        let b = [0.1, 0.4, 0.1, 0.4];
        assert_eq!(pearson(&a, &b), pearson(&b, &a));
        assert!((pearson(&a, &a) - 1.0).abs() < 1e-12);
        let reversed = [0.0, 0.2, 0.3, 0.5];
        assert!(pearson(&a, &reversed) < 0.0);
    }

    #[test]
    fn pearson_degenerate_inputs_are_zero() {
        assert_eq!(pearson(&[], &[]), 0.0);
        assert_eq!(pearson(&[1.0], &[1.0]), 0.0);
        assert_eq!(pearson(&[0.5, 0.5], &[0.2, 0.8]), 0.0);
        assert_eq!(pearson(&[0.5, 0.5], &[0.2]), 0.0);
    }

    #[test]
    fn overlap_bands() {
        let config = ComparisonConfig::default();
        assert_eq!(OverlapLevel::from_coefficient(0.95, &config), Some(OverlapLevel::Strong));
        assert_eq!(OverlapLevel::from_coefficient(0.8, &config), Some(OverlapLevel::Moderate));
        assert_eq!(OverlapLevel::from_coefficient(0.61, &config), Some(OverlapLevel::Moderate));
        assert_eq!(OverlapLevel::from_coefficient(0.5, &config), Some(OverlapLevel::Some));
        assert_eq!(OverlapLevel::from_coefficient(0.4, &config), None);
        assert_eq!(OverlapLevel::from_coefficient(-0.9, &config), None);
    }
}
