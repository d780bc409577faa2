mod distribution;
mod geography;
pub mod location;
mod volume;
mod windows;

pub use distribution::{
    category_distribution, concentration_index, consolidated_distribution, growth_rate,
    pyramid_shape, tier_distribution, CategoryShare, ConcentrationIndex, ConcentrationLevel,
    ConsolidatedShare, PyramidShape, TierShare,
};
pub use geography::{
    location_mix, region_distribution, top_countries, top_duty_stations, LocationShare,
    NamedCount,
};
pub(crate) use distribution::count_by;
pub(crate) use volume::volume_change;
pub use volume::{weekly_volume_breakdown, VolumeTrend, WeeklyBucket, WeeklyVolumeBreakdown};
pub use windows::{
    avg_application_window, short_window_share, window_distribution, WindowBucket,
    DEFAULT_APPLICATION_WINDOW, SHORT_WINDOW_DAYS,
};

use super::domain::{JobRecord, LocationType};
use super::grades::{GradeClassification, GradeClassifier};
use super::period::PeriodWindow;
use serde::Serialize;

/// A record joined with everything the calculators derive from it.
#[derive(Debug, Clone, Copy)]
pub struct EnrichedRecord<'a> {
    pub record: &'a JobRecord,
    pub grade: GradeClassification,
    pub location: LocationType,
    pub window_days: Option<i64>,
}

impl<'a> EnrichedRecord<'a> {
    pub fn new(record: &'a JobRecord, classifier: &mut GradeClassifier) -> Self {
        Self {
            record,
            grade: classifier.classify(&record.grade_code),
            location: location::resolve_location(record),
            window_days: record.application_window_days(),
        }
    }

    pub fn agency(&self) -> &'a str {
        &self.record.agency
    }

    pub fn category(&self) -> &'a str {
        self.record.category()
    }
}

pub fn enrich<'a>(records: &'a [JobRecord], classifier: &mut GradeClassifier) -> Vec<EnrichedRecord<'a>> {
    records
        .iter()
        .map(|record| EnrichedRecord::new(record, classifier))
        .collect()
}

/// Records whose posting date falls inside `window`, optionally narrowed to
/// one agency (exact name match).
pub fn slice<'a>(
    records: &[EnrichedRecord<'a>],
    window: &PeriodWindow,
    agency: Option<&str>,
) -> Vec<EnrichedRecord<'a>> {
    records
        .iter()
        .filter(|entry| window.contains_opt(entry.record.posting_date))
        .filter(|entry| agency.map_or(true, |name| entry.agency() == name))
        .copied()
        .collect()
}

/// `part / total` as a percentage; zero when there is nothing to divide by.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 * 100.0) / total as f64
    }
}

fn share_where<F>(records: &[EnrichedRecord<'_>], predicate: F) -> f64
where
    F: Fn(&EnrichedRecord<'_>) -> bool,
{
    let matching = records.iter().filter(|entry| predicate(entry)).count();
    percentage(matching, records.len())
}

pub fn staff_ratio(records: &[EnrichedRecord<'_>]) -> f64 {
    share_where(records, |entry| entry.grade.is_staff())
}

pub fn field_ratio(records: &[EnrichedRecord<'_>]) -> f64 {
    share_where(records, |entry| entry.location == LocationType::Field)
}

pub fn senior_ratio(records: &[EnrichedRecord<'_>]) -> f64 {
    share_where(records, |entry| entry.grade.tier.is_senior())
}

pub fn home_based_share(records: &[EnrichedRecord<'_>]) -> f64 {
    share_where(records, |entry| entry.location == LocationType::HomeBased)
}

/// Headline ratios computed over one slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSnapshot {
    pub total: usize,
    pub staff_ratio: f64,
    pub field_ratio: f64,
    pub senior_ratio: f64,
    pub home_based_share: f64,
    pub avg_application_window: f64,
    pub short_window_share: f64,
}

impl MetricSnapshot {
    pub fn compute(records: &[EnrichedRecord<'_>]) -> Self {
        Self {
            total: records.len(),
            staff_ratio: staff_ratio(records),
            field_ratio: field_ratio(records),
            senior_ratio: senior_ratio(records),
            home_based_share: home_based_share(records),
            avg_application_window: avg_application_window(records),
            short_window_share: short_window_share(records),
        }
    }
}

impl Default for MetricSnapshot {
    fn default() -> Self {
        Self::compute(&[])
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::super::domain::{JobRecord, LocationType};
    use chrono::NaiveDate;

    pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    pub(crate) fn job(id: usize, agency: &str, category: &str, grade: &str) -> JobRecord {
        JobRecord {
            id: format!("JR-{id}"),
            posting_date: Some(date(2025, 3, 3)),
            apply_until: Some(date(2025, 3, 17)),
            agency: agency.to_string(),
            primary_category: Some(category.to_string()),
            grade_code: grade.to_string(),
            duty_station: "Juba".to_string(),
            duty_country: "South Sudan".to_string(),
            region: Some("Africa".to_string()),
            location_type: Some(LocationType::Field),
            is_home_based: false,
        }
    }
}
