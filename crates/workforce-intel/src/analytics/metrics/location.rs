use super::super::domain::{JobRecord, LocationType};

/// Duty stations hosting agency headquarters.
pub const HEADQUARTERS_STATIONS: &[&str] = &[
    "new york",
    "geneva",
    "vienna",
    "rome",
    "paris",
    "nairobi",
    "copenhagen",
    "bonn",
    "montreal",
    "the hague",
    "washington",
    "madrid",
    "gland",
    "headquarters",
];

/// Duty stations that usually host regional bureaux or hubs.
pub const REGIONAL_HUB_STATIONS: &[&str] = &[
    "bangkok",
    "panama",
    "dakar",
    "istanbul",
    "amman",
    "cairo",
    "johannesburg",
    "pretoria",
    "addis ababa",
    "beirut",
    "santiago",
    "brussels",
    "budapest",
    "kuala lumpur",
    "dubai",
    "suva",
    "regional",
];

const HOME_BASED_MARKERS: &[&str] = &["home", "homebased", "remote", "telecommuting"];

/// Resolves where a posting is based. An explicit location type wins; the
/// duty-station text is only consulted when it is missing, and anything
/// unrecognized is treated as a field posting.
pub fn resolve_location(record: &JobRecord) -> LocationType {
    if let Some(location) = record.location_type {
        return location;
    }
    if record.is_home_based {
        return LocationType::HomeBased;
    }
    infer_from_station(&record.duty_station)
}

/// True when the words of `name` appear consecutively among `words`.
fn names_station(words: &[&str], name: &str) -> bool {
    let wanted: Vec<&str> = name.split_whitespace().collect();
    !wanted.is_empty() && words.windows(wanted.len()).any(|window| window == wanted.as_slice())
}

pub fn infer_from_station(duty_station: &str) -> LocationType {
    let station = duty_station.trim().to_lowercase();
    let words: Vec<&str> = station
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect();
    if words.is_empty() {
        return LocationType::Field;
    }

    if HEADQUARTERS_STATIONS
        .iter()
        .any(|name| names_station(&words, name))
    {
        LocationType::Headquarters
    } else if REGIONAL_HUB_STATIONS
        .iter()
        .any(|name| names_station(&words, name))
    {
        LocationType::RegionalHub
    } else if words.iter().any(|word| HOME_BASED_MARKERS.contains(word)) {
        LocationType::HomeBased
    } else {
        LocationType::Field
    }
}
