use chrono::NaiveDate;
use workforce_intel::analytics::findings::FindingTheme;
use workforce_intel::analytics::signals::SignalType;
use workforce_intel::{BriefRequest, IntelligenceEngine, JobRecord, TimeRange};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn now() -> NaiveDate {
    date(2025, 3, 31)
}

fn posting(id: &str, agency: &str, category: &str, grade: &str, posted: NaiveDate) -> JobRecord {
    JobRecord {
        id: id.to_string(),
        posting_date: Some(posted),
        apply_until: Some(posted + chrono::Duration::days(14)),
        agency: agency.to_string(),
        primary_category: Some(category.to_string()),
        grade_code: grade.to_string(),
        duty_station: "Nairobi".to_string(),
        duty_country: "Kenya".to_string(),
        region: Some("Africa".to_string()),
        location_type: None,
        is_home_based: false,
    }
}

fn batch(
    prefix: &str,
    count: usize,
    agency: &str,
    category: &str,
    grade: &str,
    posted: NaiveDate,
) -> Vec<JobRecord> {
    (0..count)
        .map(|n| posting(&format!("{prefix}-{n}"), agency, category, grade, posted))
        .collect()
}

fn current_day() -> NaiveDate {
    date(2025, 3, 10)
}

fn previous_day() -> NaiveDate {
    date(2025, 2, 10)
}

#[test]
fn staff_share_collapse_is_measured_and_flagged() {
    let mut records = batch("cur-staff", 20, "UNDP", "Programme", "P-3", current_day());
    records.extend(batch("cur-cons", 80, "UNDP", "Programme", "Consultant", current_day()));
    records.extend(batch("prev-staff", 50, "UNDP", "Programme", "P-3", previous_day()));
    records.extend(batch("prev-cons", 50, "UNDP", "Programme", "Consultant", previous_day()));

    let brief = IntelligenceEngine::default()
        .generate_brief(&records, &BriefRequest::market(TimeRange::FourWeeks, now()));

    let workforce = &brief.workforce_metrics;
    assert_eq!(brief.volume_metrics.total_positions, 100);
    assert_eq!(brief.volume_metrics.previous_positions, 100);
    assert!((workforce.staff_ratio - 20.0).abs() < 1e-9);
    assert!((workforce.previous_staff_ratio - 50.0).abs() < 1e-9);
    assert!((workforce.staff_ratio_change + 30.0).abs() < 1e-9);

    assert!(brief
        .signals
        .iter()
        .any(|signal| signal.signal_type == SignalType::StaffRatioDrift));
    assert!(brief
        .findings
        .iter()
        .any(|finding| finding.theme == FindingTheme::StaffingPattern));
    assert!(!brief
        .signals
        .iter()
        .any(|signal| signal.signal_type == SignalType::VolumeShift));
}

#[test]
fn agency_entering_a_category_is_a_new_entrant() {
    let mut records = batch("undp", 12, "UNDP", "Climate", "P-4", current_day());
    records.extend(batch("unep-now", 6, "UNEP", "Climate", "P-4", current_day()));
    records.extend(batch("unep-before", 6, "UNEP", "Climate", "P-4", previous_day()));

    let brief = IntelligenceEngine::default()
        .generate_brief(&records, &BriefRequest::market(TimeRange::FourWeeks, now()));

    let entrants = &brief.competitive_metrics.new_entrants;
    assert_eq!(entrants.len(), 1);
    assert_eq!(entrants[0].agency, "UNDP");
    assert_eq!(entrants[0].category, "Climate");
    assert_eq!(entrants[0].positions, 12);
    assert_eq!(entrants[0].previous_positions, 0);
    assert!(brief
        .signals
        .iter()
        .any(|signal| signal.signal_type == SignalType::NewCompetitor
            && signal.observation.contains("UNDP")));
}

#[test]
fn one_week_window_lands_in_the_shortest_bucket() {
    let mut record = posting("JR-7", "UNHCR", "Protection", "P-2", date(2025, 1, 5));
    record.apply_until = Some(date(2025, 1, 12));

    let brief = IntelligenceEngine::default().generate_brief(
        &[record],
        &BriefRequest::market(TimeRange::FourWeeks, date(2025, 1, 20)),
    );

    let workforce = &brief.workforce_metrics;
    assert_eq!(workforce.avg_application_window, 7.0);
    assert_eq!(workforce.short_window_share, 100.0);
    let shortest = &workforce.window_distribution[0];
    assert_eq!(shortest.label, "<10 days");
    assert_eq!(shortest.count, 1);
    assert!(workforce.window_distribution[1..]
        .iter()
        .all(|bucket| bucket.count == 0));
}

#[test]
fn busy_market_respects_signal_and_finding_caps() {
    let agencies = ["UNDP", "UNICEF", "WHO", "WFP", "UNHCR", "IOM", "UNOPS"];
    let categories = ["Health", "Programme", "Logistics", "Finance", "Climate"];
    let mut records = Vec::new();
    for (a, agency) in agencies.iter().enumerate() {
        for (c, category) in categories.iter().enumerate() {
            let now_count = 2 + (a * 3 + c * 5) % 11;
            let before_count = 1 + (a * 7 + c * 2) % 9;
            let grade = if (a + c) % 3 == 0 { "D-1" } else { "IC" };
            records.extend(batch(
                &format!("{agency}-{category}-cur"),
                now_count,
                agency,
                category,
                grade,
                current_day(),
            ));
            records.extend(batch(
                &format!("{agency}-{category}-prev"),
                before_count,
                agency,
                category,
                "P-3",
                previous_day(),
            ));
        }
    }
    records.extend(batch("hb", 40, "IOM", "Data", "Consultant", current_day()).into_iter().map(
        |mut record| {
            record.is_home_based = true;
            record.apply_until = record.posting_date.map(|day| day + chrono::Duration::days(5));
            record
        },
    ));

    let engine = IntelligenceEngine::default();
    for request in [
        BriefRequest::market(TimeRange::FourWeeks, now()),
        BriefRequest::for_agency(TimeRange::FourWeeks, now(), "IOM"),
    ] {
        let brief = engine.generate_brief(&records, &request);
        assert!(!brief.signals.is_empty());
        assert!(brief.signals.len() <= engine.config().signals.max_signals);
        assert!(brief.findings.len() <= engine.config().findings.max_findings);
        assert!(brief.signals.len() <= 8);
        assert!(brief.findings.len() <= 5);
    }
}

#[test]
fn identical_requests_produce_identical_briefs() {
    let mut records = batch("a", 9, "WFP", "Logistics", "G-5", current_day());
    records.extend(batch("b", 4, "WFP", "Logistics", "P-5", previous_day()));
    let engine = IntelligenceEngine::default();
    let request = BriefRequest::for_agency(TimeRange::FourWeeks, now(), "WFP");

    let first = serde_json::to_value(engine.generate_brief(&records, &request)).expect("serialize");
    let second = serde_json::to_value(engine.generate_brief(&records, &request)).expect("serialize");
    assert_eq!(first, second);
    assert_eq!(first["generated_at"], "2025-03-31");
    assert_eq!(first["time_range"], "4weeks");
}
