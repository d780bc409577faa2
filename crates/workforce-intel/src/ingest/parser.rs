use crate::analytics::domain::{JobRecord, LocationType};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::io::Read;

pub(crate) fn parse_csv<R: Read>(reader: R) -> Result<Vec<JobRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, row) in csv_reader.deserialize::<RecordRow>().enumerate() {
        records.push(row?.into_record(index));
    }

    Ok(records)
}

pub(crate) fn parse_json<R: Read>(reader: R) -> Result<Vec<JobRecord>, serde_json::Error> {
    let rows: Vec<RecordRow> = serde_json::from_reader(reader)?;
    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| row.into_record(index))
        .collect())
}

/// Raw row as exported by the posting pipeline. Every column is optional so
/// that dirty rows degrade to defaults instead of failing the whole file.
#[derive(Debug, Deserialize)]
struct RecordRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(
        default,
        alias = "postingDate",
        alias = "posted",
        deserialize_with = "empty_string_as_none"
    )]
    posting_date: Option<String>,
    #[serde(
        default,
        alias = "applyUntil",
        alias = "applyUntilDate",
        alias = "apply_until_date",
        deserialize_with = "empty_string_as_none"
    )]
    apply_until: Option<String>,
    #[serde(default, alias = "agencyName", deserialize_with = "empty_string_as_none")]
    agency: Option<String>,
    #[serde(
        default,
        alias = "primaryCategory",
        alias = "category",
        deserialize_with = "empty_string_as_none"
    )]
    primary_category: Option<String>,
    #[serde(
        default,
        alias = "grade_code",
        alias = "gradeCode",
        deserialize_with = "empty_string_as_none"
    )]
    grade: Option<String>,
    #[serde(default, alias = "dutyStation", deserialize_with = "empty_string_as_none")]
    duty_station: Option<String>,
    #[serde(default, alias = "dutyCountry", deserialize_with = "empty_string_as_none")]
    duty_country: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    region: Option<String>,
    #[serde(default, alias = "locationType", deserialize_with = "empty_string_as_none")]
    location_type: Option<String>,
    #[serde(default, alias = "isHomeBased")]
    is_home_based: Option<Flag>,
}

impl RecordRow {
    fn into_record(self, index: usize) -> JobRecord {
        JobRecord {
            id: self.id.unwrap_or_else(|| format!("row-{}", index + 1)),
            posting_date: self.posting_date.as_deref().and_then(parse_date),
            apply_until: self.apply_until.as_deref().and_then(parse_date),
            agency: self.agency.unwrap_or_default(),
            primary_category: self.primary_category,
            grade_code: self.grade.unwrap_or_default(),
            duty_station: self.duty_station.unwrap_or_default(),
            duty_country: self.duty_country.unwrap_or_default(),
            region: self.region,
            location_type: self.location_type.as_deref().and_then(LocationType::parse),
            is_home_based: self.is_home_based.is_some_and(Flag::is_set),
        }
    }
}

/// Boolean column that tolerates `true`, `1`, `yes` and friends.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Number(u64),
    Text(String),
}

impl Flag {
    fn is_set(self) -> bool {
        match self {
            Flag::Bool(value) => value,
            Flag::Number(value) => value != 0,
            Flag::Text(text) => matches!(
                text.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "y" | "1"
            ),
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// RFC 3339 timestamps and plain `YYYY-MM-DD` dates; anything else is
/// treated as missing.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}
