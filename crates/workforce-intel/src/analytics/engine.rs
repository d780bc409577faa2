use super::brief::{
    header_metrics, CategoryMetrics, CompetitiveMetrics, GeographicMetrics, IntelligenceBrief,
    VolumeMetrics, WorkforceMetrics,
};
use super::compare::{
    agency_profiles, category_leaders, hiring_correlations, market_concentration, new_entrants,
    similar_agencies,
};
use super::config::EngineConfig;
use super::domain::JobRecord;
use super::findings::{executive_summary, synthesize, FindingContext, SummaryContext};
use super::grades::GradeClassifier;
use super::metrics::{
    self, category_distribution, concentration_index, consolidated_distribution, enrich,
    location_mix, pyramid_shape, region_distribution, slice, tier_distribution, top_countries,
    top_duty_stations, weekly_volume_breakdown, window_distribution, MetricSnapshot,
};
use super::period::{resolve, TimeRange};
use super::signals::{detect, SignalContext};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

const MARKET_SUBJECT: &str = "the market";
const MARKET_BENCHMARK: &str = "the market";
const HISTORICAL_BENCHMARK: &str = "the 12-month baseline";

/// Inputs that select one brief. `now` anchors every period window so the
/// same request over the same records always yields the same brief.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BriefRequest {
    #[serde(default)]
    pub time_range: TimeRange,
    pub now: NaiveDate,
    /// Exact agency name; `None` analyses the whole market.
    #[serde(default)]
    pub agency: Option<String>,
}

impl BriefRequest {
    pub fn market(time_range: TimeRange, now: NaiveDate) -> Self {
        Self {
            time_range,
            now,
            agency: None,
        }
    }

    pub fn for_agency(time_range: TimeRange, now: NaiveDate, agency: impl Into<String>) -> Self {
        Self {
            time_range,
            now,
            agency: Some(agency.into()),
        }
    }
}

/// Stateless brief generator. Holds configuration only; every call builds
/// its own classifier cache and aggregates and drops them on return.
#[derive(Debug, Clone, Default)]
pub struct IntelligenceEngine {
    config: EngineConfig,
}

impl IntelligenceEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn generate_brief(&self, records: &[JobRecord], request: &BriefRequest) -> IntelligenceBrief {
        let config = &self.config;
        let periods = resolve(request.time_range, request.now);
        let agency = request.agency.as_deref();

        let mut classifier = GradeClassifier::new();
        let enriched = enrich(records, &mut classifier);
        debug!(
            records = records.len(),
            grade_codes = classifier.distinct_codes(),
            "records enriched"
        );

        let market_current = slice(&enriched, &periods.current, None);
        let market_previous = slice(&enriched, &periods.previous, None);
        let current = slice(&enriched, &periods.current, agency);
        let previous = slice(&enriched, &periods.previous, agency);
        let historical = slice(&enriched, &periods.historical, agency);
        debug!(
            market = market_current.len(),
            current = current.len(),
            previous = previous.len(),
            historical = historical.len(),
            "period slices resolved"
        );

        let current_snapshot = MetricSnapshot::compute(&current);
        let previous_snapshot = MetricSnapshot::compute(&previous);
        let historical_snapshot = MetricSnapshot::compute(&historical);
        let market_snapshot = MetricSnapshot::compute(&market_current);
        let (benchmark, benchmark_label) = match agency {
            Some(_) => (&market_snapshot, MARKET_BENCHMARK),
            None => (&historical_snapshot, HISTORICAL_BENCHMARK),
        };

        let categories = category_distribution(&current, &previous);
        let concentration = concentration_index(categories.iter().map(|share| share.count));
        let previous_concentration =
            concentration_index(categories.iter().map(|share| share.previous_count));

        let profiles = agency_profiles(&market_current, &market_previous);
        let correlations = hiring_correlations(&profiles, &market_current, &config.comparison);
        let similar = agency
            .map(|name| similar_agencies(name, &profiles, &market_current, &config.comparison))
            .unwrap_or_default();
        let entrants = new_entrants(&market_current, &market_previous, &config.comparison);
        let leaders = category_leaders(&market_current);
        let profile = agency.and_then(|name| profiles.iter().find(|p| p.agency == name));
        debug!(
            agencies = profiles.len(),
            correlations = correlations.len(),
            entrants = entrants.len(),
            "market compared"
        );

        let subject = agency.unwrap_or(MARKET_SUBJECT);
        let signals = detect(
            &SignalContext {
                subject,
                agency,
                current: &current_snapshot,
                previous: &previous_snapshot,
                historical: &historical_snapshot,
                market: &market_snapshot,
                categories: &categories,
                concentration: &concentration,
                previous_concentration: &previous_concentration,
                new_entrants: &entrants,
                entrant_min_positions: config.comparison.new_entrant_min_positions,
            },
            &config.signals,
        );

        let findings = synthesize(
            &FindingContext {
                subject,
                agency,
                benchmark_label,
                current: &current_snapshot,
                previous: &previous_snapshot,
                benchmark,
                categories: &categories,
                correlations: if agency.is_some() {
                    &similar
                } else {
                    &correlations
                },
            },
            &config.findings,
        );

        let consolidated = consolidated_distribution(&current);
        let pyramid = pyramid_shape(&consolidated);
        let period_label = periods.range.period_label();
        let comparison_label = periods.range.comparison_label();

        let executive_summary = executive_summary(&SummaryContext {
            subject,
            agency,
            period_label: &period_label,
            comparison_label: &comparison_label,
            benchmark_label,
            current: &current_snapshot,
            previous: &previous_snapshot,
            benchmark,
            profile,
            agency_count: profiles.len(),
            pyramid,
            concentration: &concentration,
            top_category: categories.first().filter(|share| share.count > 0),
            correlations: if agency.is_some() {
                &similar
            } else {
                &correlations
            },
            new_entrants: &entrants,
            signals: &signals,
            findings: &findings,
        });

        let volume_metrics = VolumeMetrics {
            total_positions: current_snapshot.total,
            previous_positions: previous_snapshot.total,
            volume_change: metrics::volume_change(current_snapshot.total, previous_snapshot.total),
            market_positions: market_snapshot.total,
            market_share: agency.map(|_| profile.map_or(0.0, |p| p.market_share)),
            rank: profile.map(|p| p.rank),
            weekly: weekly_volume_breakdown(&current, &periods.current),
        };

        let workforce_metrics = WorkforceMetrics {
            staff_ratio: current_snapshot.staff_ratio,
            previous_staff_ratio: previous_snapshot.staff_ratio,
            staff_ratio_change: current_snapshot.staff_ratio - previous_snapshot.staff_ratio,
            benchmark_staff_ratio: benchmark.staff_ratio,
            senior_ratio: current_snapshot.senior_ratio,
            senior_ratio_change: current_snapshot.senior_ratio - previous_snapshot.senior_ratio,
            historical_senior_ratio: historical_snapshot.senior_ratio,
            tiers: tier_distribution(&current),
            consolidated_tiers: consolidated,
            pyramid_shape: pyramid,
            pyramid_label: pyramid.label(),
            avg_application_window: current_snapshot.avg_application_window,
            benchmark_application_window: benchmark.avg_application_window,
            short_window_share: current_snapshot.short_window_share,
            window_distribution: window_distribution(&current),
        };

        let geographic_metrics = GeographicMetrics {
            field_ratio: current_snapshot.field_ratio,
            field_ratio_change: current_snapshot.field_ratio - previous_snapshot.field_ratio,
            benchmark_field_ratio: benchmark.field_ratio,
            home_based_share: current_snapshot.home_based_share,
            location_mix: location_mix(&current),
            top_duty_stations: top_duty_stations(&current, config.listing_limit),
            top_countries: top_countries(&current, config.listing_limit),
            regions: region_distribution(&current),
        };

        let mut fastest_growing: Vec<_> = categories
            .iter()
            .filter(|share| share.count > 0 && share.growth_rate > 0.0)
            .cloned()
            .collect();
        fastest_growing.sort_by(|a, b| {
            b.growth_rate
                .total_cmp(&a.growth_rate)
                .then_with(|| b.count.cmp(&a.count))
        });
        fastest_growing.truncate(config.listing_limit);

        let header_metrics = header_metrics(
            &volume_metrics,
            &workforce_metrics,
            profiles.len(),
            previous_snapshot.total > 0,
        );

        let competitive_metrics = CompetitiveMetrics {
            agency_count: profiles.len(),
            market_concentration: market_concentration(&profiles),
            top_agencies: profiles.iter().take(config.listing_limit).cloned().collect(),
            agency_profile: profile.cloned(),
            correlations,
            similar_agencies: similar,
            new_entrants: entrants,
            category_leaders: leaders.into_iter().take(config.listing_limit).collect(),
        };

        debug!(
            signals = signals.len(),
            findings = findings.len(),
            paragraphs = executive_summary.paragraphs.len(),
            "brief assembled"
        );

        IntelligenceBrief {
            generated_at: request.now,
            time_range: periods.range,
            period_label,
            comparison_label,
            current_period: periods.current,
            previous_period: periods.previous,
            agency_name: request.agency.clone(),
            is_agency_view: agency.is_some(),
            header_metrics,
            executive_summary,
            volume_metrics,
            workforce_metrics,
            geographic_metrics,
            category_metrics: CategoryMetrics {
                categories,
                concentration,
                previous_concentration,
                fastest_growing,
            },
            competitive_metrics,
            signals,
            findings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::metrics::fixtures::{date, job};

    #[test]
    fn empty_collection_yields_neutral_brief() {
        let engine = IntelligenceEngine::default();
        let request = BriefRequest::market(TimeRange::FourWeeks, date(2025, 3, 20));
        let brief = engine.generate_brief(&[], &request);

        assert_eq!(brief.volume_metrics.total_positions, 0);
        assert_eq!(brief.workforce_metrics.staff_ratio, 0.0);
        assert_eq!(brief.workforce_metrics.avg_application_window, 14.0);
        assert!(brief.signals.is_empty());
        assert!(brief.findings.is_empty());
        assert!(brief.executive_summary.paragraphs.is_empty());
        assert_eq!(brief.period_label, "Last 4 weeks");
        assert!(!brief.is_agency_view);
    }

    #[test]
    fn agency_view_reports_position_in_market() {
        let mut records: Vec<JobRecord> = (0..6).map(|id| job(id, "UNICEF", "Health", "P-3")).collect();
        records.extend((6..10).map(|id| job(id, "WHO", "Health", "P-4")));
        let engine = IntelligenceEngine::default();
        let request = BriefRequest::for_agency(TimeRange::FourWeeks, date(2025, 3, 20), "WHO");

        let brief = engine.generate_brief(&records, &request);
        assert!(brief.is_agency_view);
        assert_eq!(brief.agency_name.as_deref(), Some("WHO"));
        assert_eq!(brief.volume_metrics.total_positions, 4);
        assert_eq!(brief.volume_metrics.market_positions, 10);
        assert_eq!(brief.volume_metrics.rank, Some(2));
        assert_eq!(brief.volume_metrics.market_share, Some(40.0));
        assert_eq!(brief.header_metrics[1].label, "Market share");
        assert_eq!(brief.header_metrics[1].change.as_deref(), Some("#2 of 2"));
    }

    #[test]
    fn unknown_agency_gets_an_empty_agency_view() {
        let records: Vec<JobRecord> = (0..3).map(|id| job(id, "UNICEF", "Health", "P-3")).collect();
        let brief = IntelligenceEngine::default().generate_brief(
            &records,
            &BriefRequest::for_agency(TimeRange::FourWeeks, date(2025, 3, 20), "UNOPS"),
        );
        assert_eq!(brief.volume_metrics.total_positions, 0);
        assert_eq!(brief.volume_metrics.market_share, Some(0.0));
        assert_eq!(brief.volume_metrics.rank, None);
        assert_eq!(brief.competitive_metrics.agency_count, 1);
    }
}
