use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dashboard time-range selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "4weeks")]
    FourWeeks,
    #[serde(rename = "8weeks")]
    EightWeeks,
    #[serde(rename = "3months")]
    #[default]
    ThreeMonths,
    #[serde(rename = "6months")]
    SixMonths,
    #[serde(rename = "1year")]
    OneYear,
}

impl TimeRange {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::FourWeeks,
            Self::EightWeeks,
            Self::ThreeMonths,
            Self::SixMonths,
            Self::OneYear,
        ]
    }

    pub const fn weeks(self) -> i64 {
        match self {
            Self::FourWeeks => 4,
            Self::EightWeeks => 8,
            Self::ThreeMonths => 13,
            Self::SixMonths => 26,
            Self::OneYear => 52,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FourWeeks => "4weeks",
            Self::EightWeeks => "8weeks",
            Self::ThreeMonths => "3months",
            Self::SixMonths => "6months",
            Self::OneYear => "1year",
        }
    }

    pub const fn span_label(self) -> &'static str {
        match self {
            Self::FourWeeks => "4 weeks",
            Self::EightWeeks => "8 weeks",
            Self::ThreeMonths => "3 months",
            Self::SixMonths => "6 months",
            Self::OneYear => "12 months",
        }
    }

    pub fn period_label(self) -> String {
        format!("Last {}", self.span_label())
    }

    pub fn comparison_label(self) -> String {
        format!("vs. previous {}", self.span_label())
    }

    pub fn length(self) -> Duration {
        Duration::weeks(self.weeks())
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTimeRange(pub String);

impl fmt::Display for UnknownTimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown time range '{}' (expected one of 4weeks, 8weeks, 3months, 6months, 1year)",
            self.0
        )
    }
}

impl std::error::Error for UnknownTimeRange {}

impl FromStr for TimeRange {
    type Err = UnknownTimeRange;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace([' ', '-', '_'], "");
        Self::ordered()
            .into_iter()
            .find(|range| range.as_str() == normalized)
            .ok_or_else(|| UnknownTimeRange(value.to_string()))
    }
}

/// Closed date interval `[start, end]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
}

impl PeriodWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Missing posting dates are never inside any window.
    pub fn contains_opt(&self, date: Option<NaiveDate>) -> bool {
        date.map(|date| self.contains(date)).unwrap_or(false)
    }

    pub fn length(&self) -> Duration {
        self.end - self.start
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodSet {
    pub range: TimeRange,
    pub current: PeriodWindow,
    pub previous: PeriodWindow,
    pub historical: PeriodWindow,
}

pub fn resolve(range: TimeRange, now: NaiveDate) -> PeriodSet {
    let length = range.length();
    let current_start = now - length;
    let previous_start = current_start - length;
    let historical_start = now
        .checked_sub_months(Months::new(12))
        .unwrap_or(now - Duration::days(365));

    PeriodSet {
        range,
        current: PeriodWindow {
            start: current_start,
            end: now,
            label: range.period_label(),
        },
        previous: PeriodWindow {
            start: previous_start,
            end: current_start,
            label: format!("Previous {}", range.span_label()),
        },
        historical: PeriodWindow {
            start: historical_start,
            end: now,
            label: "Trailing 12 months".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 31).expect("valid date")
    }

    #[test]
    fn previous_window_abuts_current_with_equal_length() {
        for range in TimeRange::ordered() {
            let periods = resolve(range, today());
            assert_eq!(periods.previous.end, periods.current.start, "{range}");
            assert_eq!(periods.previous.length(), periods.current.length(), "{range}");
            assert_eq!(periods.current.length(), Duration::weeks(range.weeks()));
            assert_eq!(periods.current.end, today());
        }
    }

    #[test]
    fn historical_window_is_trailing_year() {
        let periods = resolve(TimeRange::FourWeeks, today());
        assert_eq!(
            periods.historical.start,
            NaiveDate::from_ymd_opt(2024, 3, 31).expect("valid date")
        );
        assert_eq!(periods.historical.end, today());
    }

    #[test]
    fn membership_is_closed_and_skips_missing_dates() {
        let periods = resolve(TimeRange::FourWeeks, today());
        assert!(periods.current.contains(periods.current.start));
        assert!(periods.current.contains(periods.current.end));
        assert!(!periods.current.contains(periods.current.start - Duration::days(1)));
        assert!(!periods.current.contains_opt(None));
    }

    #[test]
    fn parses_wire_selectors() {
        assert_eq!("4weeks".parse::<TimeRange>(), Ok(TimeRange::FourWeeks));
        assert_eq!("3 Months".parse::<TimeRange>(), Ok(TimeRange::ThreeMonths));
        assert_eq!("1-year".parse::<TimeRange>(), Ok(TimeRange::OneYear));
        assert!("fortnight".parse::<TimeRange>().is_err());
        assert_eq!(TimeRange::SixMonths.comparison_label(), "vs. previous 6 months");
        assert_eq!(TimeRange::default(), TimeRange::ThreeMonths);
    }
}
