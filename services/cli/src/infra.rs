use chrono::{Local, NaiveDate};
use serde::Serialize;
use workforce_intel::error::AppError;

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn today_or(now: Option<NaiveDate>) -> NaiveDate {
    now.unwrap_or_else(|| Local::now().date_naive())
}

pub(crate) fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), AppError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_reports_bad_input() {
        assert_eq!(parse_date(" 2025-03-20 "), Ok(NaiveDate::from_ymd_opt(2025, 3, 20).expect("date")));
        let err = parse_date("20/03/2025").unwrap_err();
        assert!(err.contains("YYYY-MM-DD"));
    }
}
