//! Workforce intelligence over job-posting records: period slicing, metric
//! calculators, cross-agency benchmarks, rule-based signals and ranked
//! narrative findings, assembled into one brief per request.

pub mod analytics;
pub mod config;
pub mod error;
pub mod ingest;
pub mod telemetry;

pub use analytics::{
    BriefRequest, EngineConfig, IntelligenceBrief, IntelligenceEngine, JobRecord, LocationType,
    TimeRange,
};
