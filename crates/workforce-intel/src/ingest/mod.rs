//! Loads job-posting records from CSV or JSON exports.

mod parser;

pub use parser::parse_date;

use crate::analytics::domain::JobRecord;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read job records: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid job-record CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid job-record JSON data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported record format '{0}' (expected csv or json)")]
    UnsupportedFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Csv,
    Json,
}

impl RecordFormat {
    /// Guesses the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        extension.parse()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordFormat {
    type Err = IngestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(IngestError::UnsupportedFormat(other.to_string())),
        }
    }
}

pub struct RecordLoader;

impl RecordLoader {
    /// Reads a file, taking the format from `format` or else the extension.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        format: Option<RecordFormat>,
    ) -> Result<Vec<JobRecord>, IngestError> {
        let path = path.as_ref();
        let format = match format {
            Some(format) => format,
            None => RecordFormat::from_path(path)?,
        };
        let file = std::fs::File::open(path)?;
        let records = Self::from_reader(file, format)?;
        debug!(path = %path.display(), %format, records = records.len(), "job records loaded");
        Ok(records)
    }

    pub fn from_reader<R: Read>(reader: R, format: RecordFormat) -> Result<Vec<JobRecord>, IngestError> {
        let records = match format {
            RecordFormat::Csv => parser::parse_csv(reader)?,
            RecordFormat::Json => parser::parse_json(reader)?,
        };
        Ok(records)
    }
}
