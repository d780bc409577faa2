use super::super::config::ComparisonConfig;
use super::super::metrics::EnrichedRecord;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewEntrant {
    pub agency: String,
    pub category: String,
    pub positions: usize,
    pub previous_positions: usize,
}

fn agency_category_counts<'a>(records: &[EnrichedRecord<'a>]) -> BTreeMap<(&'a str, &'a str), usize> {
    let mut counts = BTreeMap::new();
    for entry in records {
        *counts.entry((entry.agency(), entry.category())).or_insert(0) += 1;
    }
    counts
}

/// Agencies that started hiring in a category this period: at least
/// `new_entrant_min_positions` now, at most `new_entrant_previous_floor` before.
pub fn new_entrants(
    current: &[EnrichedRecord<'_>],
    previous: &[EnrichedRecord<'_>],
    config: &ComparisonConfig,
) -> Vec<NewEntrant> {
    let previous_counts = agency_category_counts(previous);

    let mut entrants: Vec<NewEntrant> = agency_category_counts(current)
        .into_iter()
        .filter_map(|((agency, category), positions)| {
            let previous_positions = previous_counts
                .get(&(agency, category))
                .copied()
                .unwrap_or(0);
            (positions >= config.new_entrant_min_positions
                && previous_positions <= config.new_entrant_previous_floor)
                .then(|| NewEntrant {
                    agency: agency.to_string(),
                    category: category.to_string(),
                    positions,
                    previous_positions,
                })
        })
        .collect();

    entrants.sort_by(|a, b| {
        b.positions
            .cmp(&a.positions)
            .then_with(|| a.agency.cmp(&b.agency))
            .then_with(|| a.category.cmp(&b.category))
    });
    entrants
}
