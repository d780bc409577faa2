use super::{percentage, EnrichedRecord};
use serde::Serialize;

/// Reported when a slice has no usable application windows.
pub const DEFAULT_APPLICATION_WINDOW: f64 = 14.0;
/// Windows at or beyond this many days are treated as data-entry errors.
pub const MAX_PLAUSIBLE_WINDOW: i64 = 120;
/// Postings open for fewer days than this count as short-window.
pub const SHORT_WINDOW_DAYS: i64 = 10;

fn valid_windows(records: &[EnrichedRecord<'_>]) -> Vec<i64> {
    records
        .iter()
        .filter_map(|entry| entry.window_days)
        .filter(|days| *days > 0 && *days < MAX_PLAUSIBLE_WINDOW)
        .collect()
}

pub fn avg_application_window(records: &[EnrichedRecord<'_>]) -> f64 {
    let (sum, count) = valid_windows(records)
        .into_iter()
        .fold((0i64, 0usize), |(sum, count), days| (sum + days, count + 1));

    if count == 0 {
        DEFAULT_APPLICATION_WINDOW
    } else {
        sum as f64 / count as f64
    }
}

/// Share of valid windows shorter than [`SHORT_WINDOW_DAYS`].
pub fn short_window_share(records: &[EnrichedRecord<'_>]) -> f64 {
    let (short, total) = valid_windows(records)
        .into_iter()
        .fold((0usize, 0usize), |(short, total), days| {
            (short + usize::from(days < SHORT_WINDOW_DAYS), total + 1)
        });
    percentage(short, total)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowBucket {
    pub label: &'static str,
    pub min_days: i64,
    pub max_days: i64,
    pub count: usize,
    pub percentage: f64,
}

const WINDOW_BUCKETS: [(&str, i64, i64); 5] = [
    ("<10 days", 1, 9),
    ("10-14 days", 10, 14),
    ("15-21 days", 15, 21),
    ("22-30 days", 22, 30),
    (">30 days", 31, MAX_PLAUSIBLE_WINDOW - 1),
];

pub fn window_distribution(records: &[EnrichedRecord<'_>]) -> Vec<WindowBucket> {
    let windows = valid_windows(records);

    WINDOW_BUCKETS
        .iter()
        .map(|&(label, min_days, max_days)| {
            let count = windows
                .iter()
                .filter(|days| (min_days..=max_days).contains(*days))
                .count();
            WindowBucket {
                label,
                min_days,
                max_days,
                count,
                percentage: percentage(count, windows.len()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{date, job};
    use super::super::{enrich, EnrichedRecord};
    use super::*;
    use crate::analytics::domain::JobRecord;
    use crate::analytics::grades::GradeClassifier;

    fn with_window(id: usize, days: Option<i64>) -> JobRecord {
        let mut record = job(id, "UNHCR", "Protection", "P-3");
        let posted = date(2025, 1, 5);
        record.posting_date = Some(posted);
        record.apply_until = days.map(|days| posted + chrono::Duration::days(days));
        record
    }

    fn enriched(records: &[JobRecord]) -> Vec<EnrichedRecord<'_>> {
        let mut classifier = GradeClassifier::new();
        enrich(records, &mut classifier)
    }

    #[test]
    fn seven_day_window_lands_in_short_bucket() {
        let mut record = with_window(1, None);
        record.apply_until = Some(date(2025, 1, 12));
        let records = vec![record];
        let entries = enriched(&records);

        assert_eq!(entries[0].window_days, Some(7));
        assert_eq!(short_window_share(&entries), 100.0);
        let buckets = window_distribution(&entries);
        assert_eq!(buckets[0].label, "<10 days");
        assert_eq!(buckets[0].count, 1);
    }

    #[test]
    fn average_ignores_outliers_and_defaults() {
        let records = vec![
            with_window(1, Some(10)),
            with_window(2, Some(20)),
            with_window(3, Some(0)),
            with_window(4, Some(-4)),
            with_window(5, Some(400)),
            with_window(6, None),
        ];
        let entries = enriched(&records);
        assert_eq!(avg_application_window(&entries), 15.0);
        assert_eq!(short_window_share(&entries), 0.0);

        let outliers_only = vec![with_window(1, Some(0)), with_window(2, Some(120))];
        let entries = enriched(&outliers_only);
        assert_eq!(avg_application_window(&entries), DEFAULT_APPLICATION_WINDOW);
        assert!(window_distribution(&entries)
            .iter()
            .all(|bucket| bucket.count == 0 && bucket.percentage == 0.0));
    }
}
