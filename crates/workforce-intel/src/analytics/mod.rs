pub mod brief;
pub mod compare;
pub mod config;
pub mod domain;
pub mod engine;
pub mod findings;
pub mod grades;
pub mod metrics;
pub mod period;
pub mod signals;

pub use brief::IntelligenceBrief;
pub use config::EngineConfig;
pub use domain::{JobRecord, LocationType};
pub use engine::{BriefRequest, IntelligenceEngine};
pub use grades::{classify, GradeClassification};
pub use period::TimeRange;
