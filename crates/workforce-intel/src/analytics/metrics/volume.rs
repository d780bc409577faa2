use super::super::period::PeriodWindow;
use super::{percentage, EnrichedRecord};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

const ACCELERATION_FACTOR: f64 = 1.3;
const DECELERATION_FACTOR: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeTrend {
    Accelerating,
    Decelerating,
    Steady,
}

impl VolumeTrend {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Accelerating => "accelerating",
            Self::Decelerating => "decelerating",
            Self::Steady => "steady",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyBucket {
    pub week_label: String,
    pub week_start: NaiveDate,
    pub count: usize,
    pub cumulative_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyVolumeBreakdown {
    pub weeks: Vec<WeeklyBucket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_week: Option<WeeklyBucket>,
    pub first_half_share: f64,
    pub second_half_share: f64,
    pub acceleration: VolumeTrend,
}

fn iso_week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

fn week_label(week_start: NaiveDate) -> String {
    let iso = week_start.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

/// Buckets postings by ISO week across every week `window` touches. Weeks
/// with no postings are kept so both halves cover the same span; with an
/// odd number of weeks the middle week is split evenly between halves.
pub fn weekly_volume_breakdown(
    records: &[EnrichedRecord<'_>],
    window: &PeriodWindow,
) -> WeeklyVolumeBreakdown {
    let first_week = iso_week_start(window.start);
    let last_week = iso_week_start(window.end);

    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    let mut cursor = first_week;
    while cursor <= last_week {
        counts.insert(cursor, 0);
        cursor += Duration::weeks(1);
    }

    for date in records.iter().filter_map(|entry| entry.record.posting_date) {
        if !window.contains(date) {
            continue;
        }
        if let Some(count) = counts.get_mut(&iso_week_start(date)) {
            *count += 1;
        }
    }

    let mut cumulative_count = 0;
    let weeks: Vec<WeeklyBucket> = counts
        .into_iter()
        .map(|(week_start, count)| {
            cumulative_count += count;
            WeeklyBucket {
                week_label: week_label(week_start),
                week_start,
                count,
                cumulative_count,
            }
        })
        .collect();

    let total = cumulative_count;
    let peak_week = weeks
        .iter()
        .filter(|week| week.count > 0)
        .fold(None::<&WeeklyBucket>, |best, week| match best {
            Some(current) if current.count >= week.count => Some(current),
            _ => Some(week),
        })
        .cloned();

    let half = weeks.len() / 2;
    let middle = if weeks.len() % 2 == 1 {
        weeks[half].count as f64 / 2.0
    } else {
        0.0
    };
    let first_half = weeks[..half].iter().map(|week| week.count).sum::<usize>() as f64 + middle;
    let second_half = weeks[weeks.len() - half..]
        .iter()
        .map(|week| week.count)
        .sum::<usize>() as f64
        + middle;

    let acceleration = classify_acceleration(first_half, second_half, weeks.len(), total);
    let (first_half_share, second_half_share) = if total == 0 {
        (0.0, 0.0)
    } else {
        (
            first_half * 100.0 / total as f64,
            second_half * 100.0 / total as f64,
        )
    };

    WeeklyVolumeBreakdown {
        weeks,
        peak_week,
        first_half_share,
        second_half_share,
        acceleration,
    }
}

fn classify_acceleration(first: f64, second: f64, weeks: usize, total: usize) -> VolumeTrend {
    if weeks < 2 || total == 0 {
        return VolumeTrend::Steady;
    }
    if second > first * ACCELERATION_FACTOR {
        VolumeTrend::Accelerating
    } else if second < first * DECELERATION_FACTOR {
        VolumeTrend::Decelerating
    } else {
        VolumeTrend::Steady
    }
}

/// Percent change between two counts; see [`super::growth_rate`] for the
/// category flavour that reports new activity as +100%.
pub(crate) fn volume_change(current: usize, previous: usize) -> f64 {
    if previous == 0 {
        return if current == 0 { 0.0 } else { 100.0 };
    }
    percentage(current, previous) - 100.0
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{date, job};
    use super::super::enrich;
    use super::*;
    use crate::analytics::domain::JobRecord;
    use crate::analytics::grades::GradeClassifier;

    fn window() -> PeriodWindow {
        // Monday 2025-03-03 through Sunday 2025-03-30: exactly four ISO weeks.
        PeriodWindow {
            start: date(2025, 3, 3),
            end: date(2025, 3, 30),
            label: "test".to_string(),
        }
    }

    fn posted_on(id: usize, day: NaiveDate) -> JobRecord {
        let mut record = job(id, "UNFPA", "Health", "P-3");
        record.posting_date = Some(day);
        record
    }

    #[test]
    fn buckets_are_ordered_with_cumulative_counts() {
        let records = vec![
            posted_on(1, date(2025, 3, 4)),
            posted_on(2, date(2025, 3, 18)),
            posted_on(3, date(2025, 3, 19)),
            posted_on(4, date(2025, 3, 30)),
        ];
        let mut classifier = GradeClassifier::new();
        let entries = enrich(&records, &mut classifier);
        let breakdown = weekly_volume_breakdown(&entries, &window());

        let counts: Vec<usize> = breakdown.weeks.iter().map(|week| week.count).collect();
        assert_eq!(counts, vec![1, 0, 2, 1]);
        let cumulative: Vec<usize> = breakdown
            .weeks
            .iter()
            .map(|week| week.cumulative_count)
            .collect();
        assert_eq!(cumulative, vec![1, 1, 3, 4]);
        assert_eq!(breakdown.weeks[0].week_label, "2025-W10");

        let peak = breakdown.peak_week.expect("peak week present");
        assert_eq!(peak.week_start, date(2025, 3, 17));
        assert_eq!(breakdown.first_half_share, 25.0);
        assert_eq!(breakdown.second_half_share, 75.0);
        assert_eq!(breakdown.acceleration, VolumeTrend::Accelerating);
    }

    #[test]
    fn front_loaded_volume_decelerates() {
        let records: Vec<JobRecord> = (0..6)
            .map(|id| posted_on(id, date(2025, 3, 5)))
            .chain(std::iter::once(posted_on(9, date(2025, 3, 26))))
            .collect();
        let mut classifier = GradeClassifier::new();
        let entries = enrich(&records, &mut classifier);
        let breakdown = weekly_volume_breakdown(&entries, &window());
        assert_eq!(breakdown.acceleration, VolumeTrend::Decelerating);
    }

    #[test]
    fn empty_window_is_steady_without_peak() {
        let breakdown = weekly_volume_breakdown(&[], &window());
        assert_eq!(breakdown.weeks.len(), 4);
        assert!(breakdown.peak_week.is_none());
        assert_eq!(breakdown.acceleration, VolumeTrend::Steady);
        assert_eq!(breakdown.first_half_share, 0.0);
    }

    #[test]
    fn volume_change_guards_zero_previous() {
        assert_eq!(volume_change(0, 0), 0.0);
        assert_eq!(volume_change(5, 0), 100.0);
        assert_eq!(volume_change(50, 100), -50.0);
        assert_eq!(volume_change(150, 100), 50.0);
    }
}
