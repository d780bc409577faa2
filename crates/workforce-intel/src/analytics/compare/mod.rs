mod correlation;
mod entrants;

pub use correlation::{
    hiring_correlations, pearson, similar_agencies, AgencyCorrelation, OverlapLevel,
};
pub use entrants::{new_entrants, NewEntrant};

use super::metrics::{self, count_by, percentage, EnrichedRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-agency benchmark row for one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgencyProfile {
    pub agency: String,
    pub rank: usize,
    pub positions: usize,
    pub previous_positions: usize,
    pub market_share: f64,
    pub volume_change: f64,
    pub staff_ratio: f64,
    pub field_ratio: f64,
    pub senior_ratio: f64,
    pub avg_application_window: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_category: Option<String>,
}

fn group_by_agency<'a>(records: &[EnrichedRecord<'a>]) -> BTreeMap<&'a str, Vec<EnrichedRecord<'a>>> {
    let mut groups: BTreeMap<&'a str, Vec<EnrichedRecord<'a>>> = BTreeMap::new();
    for entry in records {
        groups.entry(entry.agency()).or_default().push(*entry);
    }
    groups
}

fn top_category(records: &[EnrichedRecord<'_>]) -> Option<String> {
    count_by(records, |entry| entry.category())
        .into_iter()
        .fold(None::<(&str, usize)>, |best, (category, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((category, count)),
        })
        .map(|(category, _)| category.to_string())
}

/// Ranks every agency present in the current market by position count,
/// ties broken alphabetically so the order is reproducible.
pub fn agency_profiles(
    current: &[EnrichedRecord<'_>],
    previous: &[EnrichedRecord<'_>],
) -> Vec<AgencyProfile> {
    let market_total = current.len();
    let previous_counts = count_by(previous, |entry| entry.agency());

    let mut profiles: Vec<AgencyProfile> = group_by_agency(current)
        .into_iter()
        .map(|(agency, records)| {
            let previous_positions = previous_counts.get(agency).copied().unwrap_or(0);
            AgencyProfile {
                agency: agency.to_string(),
                rank: 0,
                positions: records.len(),
                previous_positions,
                market_share: percentage(records.len(), market_total),
                volume_change: metrics::volume_change(records.len(), previous_positions),
                staff_ratio: metrics::staff_ratio(&records),
                field_ratio: metrics::field_ratio(&records),
                senior_ratio: metrics::senior_ratio(&records),
                avg_application_window: metrics::avg_application_window(&records),
                top_category: top_category(&records),
            }
        })
        .collect();

    profiles.sort_by(|a, b| {
        b.positions
            .cmp(&a.positions)
            .then_with(|| a.agency.cmp(&b.agency))
    });
    for (index, profile) in profiles.iter_mut().enumerate() {
        profile.rank = index + 1;
    }
    profiles
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryLeader {
    pub category: String,
    pub agency: String,
    pub positions: usize,
    pub category_total: usize,
    pub share_of_category: f64,
}

/// Leading agency per category, biggest categories first.
pub fn category_leaders(current: &[EnrichedRecord<'_>]) -> Vec<CategoryLeader> {
    let mut per_category: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
    for entry in current {
        *per_category
            .entry(entry.category())
            .or_default()
            .entry(entry.agency())
            .or_insert(0) += 1;
    }

    let mut leaders: Vec<CategoryLeader> = per_category
        .into_iter()
        .filter_map(|(category, agencies)| {
            let category_total: usize = agencies.values().sum();
            let (agency, positions) = agencies.into_iter().fold(
                None::<(&str, usize)>,
                |best, (agency, count)| match best {
                    Some((_, best_count)) if best_count >= count => best,
                    _ => Some((agency, count)),
                },
            )?;
            Some(CategoryLeader {
                category: category.to_string(),
                agency: agency.to_string(),
                positions,
                category_total,
                share_of_category: percentage(positions, category_total),
            })
        })
        .collect();

    leaders.sort_by(|a, b| {
        b.category_total
            .cmp(&a.category_total)
            .then_with(|| a.category.cmp(&b.category))
    });
    leaders
}

/// Herfindahl concentration of the market across agencies.
pub fn market_concentration(profiles: &[AgencyProfile]) -> metrics::ConcentrationIndex {
    metrics::concentration_index(profiles.iter().map(|profile| profile.positions))
}
