use crate::infra::{parse_date, print_json, today_or};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::info;
use workforce_intel::analytics::grades::{classify, GradeClassification};
use workforce_intel::config::AppConfig;
use workforce_intel::error::AppError;
use workforce_intel::ingest::{RecordFormat, RecordLoader};
use workforce_intel::{BriefRequest, IntelligenceBrief, IntelligenceEngine, JobRecord, TimeRange};

#[derive(Args, Debug)]
pub(crate) struct SourceArgs {
    /// CSV or JSON export of job postings
    #[arg(long)]
    pub(crate) records: PathBuf,
    /// Record format; inferred from the file extension when omitted
    #[arg(long)]
    pub(crate) format: Option<RecordFormat>,
}

#[derive(Args, Debug)]
pub(crate) struct BriefArgs {
    #[command(flatten)]
    pub(crate) source: SourceArgs,
    /// Analysis window (4weeks, 8weeks, 3months, 6months, 1year)
    #[arg(long, default_value_t = TimeRange::ThreeMonths)]
    pub(crate) range: TimeRange,
    /// Reference date in YYYY-MM-DD format (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) now: Option<NaiveDate>,
    /// Restrict the brief to one agency; omit for the market view
    #[arg(long)]
    pub(crate) agency: Option<String>,
    /// Pretty-print the JSON output
    #[arg(long)]
    pub(crate) pretty: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AgenciesArgs {
    #[command(flatten)]
    pub(crate) source: SourceArgs,
    #[arg(long, default_value_t = TimeRange::ThreeMonths)]
    pub(crate) range: TimeRange,
    /// Reference date in YYYY-MM-DD format (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) now: Option<NaiveDate>,
    /// Number of leading agencies to brief
    #[arg(long, default_value_t = 5)]
    pub(crate) limit: usize,
    #[arg(long)]
    pub(crate) pretty: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ClassifyArgs {
    /// Grade codes such as P-4, NOB or IPSA-10
    #[arg(required = true)]
    pub(crate) codes: Vec<String>,
    #[arg(long)]
    pub(crate) pretty: bool,
}

#[derive(Debug, Serialize)]
struct AgencyDigest {
    agency: String,
    rank: Option<usize>,
    positions: usize,
    market_share: Option<f64>,
    signals: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_signal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_finding: Option<String>,
}

impl AgencyDigest {
    fn from_brief(agency: String, brief: &IntelligenceBrief) -> Self {
        Self {
            agency,
            rank: brief.volume_metrics.rank,
            positions: brief.volume_metrics.total_positions,
            market_share: brief.volume_metrics.market_share,
            signals: brief.signals.len(),
            top_signal: brief.signals.first().map(|signal| signal.observation.clone()),
            top_finding: brief.findings.first().map(|finding| finding.headline.clone()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ClassifiedCode<'a> {
    code: &'a str,
    #[serde(flatten)]
    classification: GradeClassification,
}

fn load_records(source: &SourceArgs) -> Result<Vec<JobRecord>, AppError> {
    let records = RecordLoader::from_path(&source.records, source.format)?;
    info!(path = %source.records.display(), records = records.len(), "job records loaded");
    Ok(records)
}

fn build_brief(config: &AppConfig, args: &BriefArgs) -> Result<IntelligenceBrief, AppError> {
    let records = load_records(&args.source)?;
    let request = BriefRequest {
        time_range: args.range,
        now: today_or(args.now),
        agency: args.agency.clone(),
    };
    let engine = IntelligenceEngine::new(config.engine.clone());
    let brief = engine.generate_brief(&records, &request);
    info!(
        range = %request.time_range,
        agency = request.agency.as_deref().unwrap_or("market"),
        signals = brief.signals.len(),
        findings = brief.findings.len(),
        "brief generated"
    );
    Ok(brief)
}

pub(crate) fn run_brief(config: &AppConfig, args: BriefArgs) -> Result<(), AppError> {
    let brief = build_brief(config, &args)?;
    print_json(&brief, args.pretty)
}

pub(crate) fn run_signals(config: &AppConfig, args: BriefArgs) -> Result<(), AppError> {
    let brief = build_brief(config, &args)?;
    print_json(&brief.signals, args.pretty)
}

/// Briefs the top agencies of the market view concurrently. Each brief is
/// CPU-bound, so it runs on the blocking pool over shared records.
pub(crate) async fn run_agencies(config: &AppConfig, args: AgenciesArgs) -> Result<(), AppError> {
    let records = Arc::new(load_records(&args.source)?);
    let engine = Arc::new(IntelligenceEngine::new(config.engine.clone()));
    let now = today_or(args.now);

    let market = engine.generate_brief(&records, &BriefRequest::market(args.range, now));
    let agencies: Vec<String> = market
        .competitive_metrics
        .top_agencies
        .iter()
        .take(args.limit)
        .map(|profile| profile.agency.clone())
        .collect();
    info!(agencies = agencies.len(), range = %args.range, "briefing leading agencies");

    let mut tasks = JoinSet::new();
    for (position, agency) in agencies.into_iter().enumerate() {
        let records = Arc::clone(&records);
        let engine = Arc::clone(&engine);
        let range = args.range;
        tasks.spawn_blocking(move || {
            let request = BriefRequest::for_agency(range, now, agency.clone());
            let brief = engine.generate_brief(&records, &request);
            (position, AgencyDigest::from_brief(agency, &brief))
        });
    }

    let mut digests = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        let entry = joined.map_err(|err| AppError::Task(err.to_string()))?;
        digests.push(entry);
    }
    digests.sort_by_key(|(position, _)| *position);
    let digests: Vec<AgencyDigest> = digests.into_iter().map(|(_, digest)| digest).collect();

    print_json(&digests, args.pretty)
}

pub(crate) fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let classified: Vec<ClassifiedCode<'_>> = args
        .codes
        .iter()
        .map(|code| ClassifiedCode {
            code,
            classification: classify(code),
        })
        .collect();
    print_json(&classified, args.pretty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_reads_headline_fields() {
        let brief = IntelligenceEngine::default().generate_brief(
            &[],
            &BriefRequest::for_agency(
                TimeRange::FourWeeks,
                NaiveDate::from_ymd_opt(2025, 3, 20).expect("date"),
                "UNDP",
            ),
        );
        let digest = AgencyDigest::from_brief("UNDP".to_string(), &brief);
        assert_eq!(digest.positions, 0);
        assert_eq!(digest.rank, None);
        assert_eq!(digest.market_share, Some(0.0));
        assert!(digest.top_finding.is_none());
    }

    #[test]
    fn classified_codes_flatten_classification() {
        let value = serde_json::to_value(ClassifiedCode {
            code: "P-4",
            classification: classify("P-4"),
        })
        .expect("serialize");
        assert_eq!(value["code"], "P-4");
        assert!(value.get("tier").is_some());
        assert!(value.get("staff_category").is_some());
    }
}
