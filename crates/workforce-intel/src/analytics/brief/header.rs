use super::super::findings::Trend;
use super::{HeaderMetric, VolumeMetrics, WorkforceMetrics};

fn points(delta: f64) -> String {
    format!("{delta:+.1}pp")
}

/// Top-of-brief tiles. The second tile is market share in an agency view and
/// the number of hiring agencies otherwise.
pub(crate) fn header_metrics(
    volume: &VolumeMetrics,
    workforce: &WorkforceMetrics,
    agency_count: usize,
    has_previous: bool,
) -> Vec<HeaderMetric> {
    let mut metrics = vec![HeaderMetric {
        label: "Positions",
        value: volume.total_positions.to_string(),
        change: has_previous.then(|| format!("{:+.0}%", volume.volume_change)),
        trend: Trend::from_delta(volume.volume_change, 0.0),
    }];

    metrics.push(match volume.market_share {
        Some(share) => HeaderMetric {
            label: "Market share",
            value: format!("{share:.1}%"),
            change: volume.rank.map(|rank| format!("#{rank} of {agency_count}")),
            trend: Trend::Stable,
        },
        None => HeaderMetric {
            label: "Hiring agencies",
            value: agency_count.to_string(),
            change: None,
            trend: Trend::Stable,
        },
    });

    metrics.push(HeaderMetric {
        label: "Staff ratio",
        value: format!("{:.1}%", workforce.staff_ratio),
        change: has_previous.then(|| points(workforce.staff_ratio_change)),
        trend: Trend::from_delta(workforce.staff_ratio_change, 0.0),
    });
    metrics.push(HeaderMetric {
        label: "Senior ratio",
        value: format!("{:.1}%", workforce.senior_ratio),
        change: has_previous.then(|| points(workforce.senior_ratio_change)),
        trend: Trend::from_delta(workforce.senior_ratio_change, 0.0),
    });
    metrics.push(HeaderMetric {
        label: "Avg application window",
        value: format!("{:.1} days", workforce.avg_application_window),
        change: Some(format!(
            "{:+.1} days vs benchmark",
            workforce.avg_application_window - workforce.benchmark_application_window
        )),
        trend: Trend::from_delta(
            workforce.avg_application_window - workforce.benchmark_application_window,
            0.0,
        ),
    });
    metrics
}
