use super::super::domain::LocationType;
use super::distribution::count_by;
use super::{percentage, EnrichedRecord};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationShare {
    pub location: LocationType,
    pub label: &'static str,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedCount {
    pub name: String,
    pub count: usize,
    pub percentage: f64,
}

pub fn location_mix(records: &[EnrichedRecord<'_>]) -> Vec<LocationShare> {
    LocationType::ordered()
        .into_iter()
        .map(|location| {
            let count = records
                .iter()
                .filter(|entry| entry.location == location)
                .count();
            LocationShare {
                location,
                label: location.label(),
                count,
                percentage: percentage(count, records.len()),
            }
        })
        .collect()
}

fn ranked<'a, F>(records: &[EnrichedRecord<'a>], limit: Option<usize>, key: F) -> Vec<NamedCount>
where
    F: Fn(&EnrichedRecord<'a>) -> &'a str,
{
    let total = records.len();
    let mut counts: Vec<(&str, usize)> = count_by(records, key).into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    counts
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|(name, count)| NamedCount {
            name: name.to_string(),
            count,
            percentage: percentage(count, total),
        })
        .collect()
}

fn non_blank<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}

pub fn top_duty_stations(records: &[EnrichedRecord<'_>], limit: usize) -> Vec<NamedCount> {
    ranked(records, Some(limit), |entry| {
        non_blank(&entry.record.duty_station, "Unspecified")
    })
}

pub fn top_countries(records: &[EnrichedRecord<'_>], limit: usize) -> Vec<NamedCount> {
    ranked(records, Some(limit), |entry| {
        non_blank(&entry.record.duty_country, "Unspecified")
    })
}

/// Every region present, with missing regions folded into "Unspecified".
pub fn region_distribution(records: &[EnrichedRecord<'_>]) -> Vec<NamedCount> {
    ranked(records, None, |entry| entry.record.region_label())
}
