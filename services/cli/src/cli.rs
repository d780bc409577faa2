use crate::commands::{
    run_agencies, run_brief, run_classify, run_signals, AgenciesArgs, BriefArgs, ClassifyArgs,
};
use clap::{Parser, Subcommand};
use tracing::info;
use workforce_intel::config::AppConfig;
use workforce_intel::error::AppError;
use workforce_intel::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "workforce-intel",
    about = "Generate workforce intelligence briefs from UN job-posting exports",
    version
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the full intelligence brief as JSON
    Brief(BriefArgs),
    /// Print only the triggered signals for a brief
    Signals(BriefArgs),
    /// Generate one brief per leading agency in parallel and print a digest
    Agencies(AgenciesArgs),
    /// Classify raw grade codes
    Classify(ClassifyArgs),
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    info!(
        environment = ?config.environment,
        top_k = config.engine.comparison.top_k,
        "workforce intelligence cli ready"
    );

    match cli.command {
        Command::Brief(args) => run_brief(&config, args),
        Command::Signals(args) => run_signals(&config, args),
        Command::Agencies(args) => run_agencies(&config, args).await,
        Command::Classify(args) => run_classify(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workforce_intel::ingest::RecordFormat;
    use workforce_intel::TimeRange;

    #[test]
    fn brief_arguments_parse_with_defaults() {
        let cli = Cli::try_parse_from(["workforce-intel", "brief", "--records", "postings.csv"])
            .expect("brief parses");
        let Command::Brief(args) = cli.command else {
            panic!("expected brief command");
        };
        assert_eq!(args.range, TimeRange::ThreeMonths);
        assert_eq!(args.source.format, None);
        assert!(args.agency.is_none());
    }

    #[test]
    fn brief_arguments_accept_overrides() {
        let cli = Cli::try_parse_from([
            "workforce-intel",
            "signals",
            "--records",
            "postings.dat",
            "--format",
            "json",
            "--range",
            "4weeks",
            "--now",
            "2025-03-20",
            "--agency",
            "UNICEF",
        ])
        .expect("signals parses");
        let Command::Signals(args) = cli.command else {
            panic!("expected signals command");
        };
        assert_eq!(args.source.format, Some(RecordFormat::Json));
        assert_eq!(args.range, TimeRange::FourWeeks);
        assert_eq!(args.agency.as_deref(), Some("UNICEF"));
    }

    #[test]
    fn rejects_unknown_range() {
        let result = Cli::try_parse_from([
            "workforce-intel",
            "brief",
            "--records",
            "postings.csv",
            "--range",
            "fortnight",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn classify_takes_codes() {
        let cli = Cli::try_parse_from(["workforce-intel", "classify", "P-4", "IPSA-10"])
            .expect("classify parses");
        let Command::Classify(args) = cli.command else {
            panic!("expected classify command");
        };
        assert_eq!(args.codes, vec!["P-4", "IPSA-10"]);
    }
}
