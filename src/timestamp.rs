//! Timestamp parsing shared by meter intake and tariff documents.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer};

/// Naive layouts tried after RFC 3339, in order.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Parses a timestamp in any of the accepted layouts.
///
/// Offset-bearing RFC 3339 values keep their written wall-clock time and drop
/// the offset, so `14:30+10:00` rates as 14:30. Meter rows and schedule
/// entries share this convention.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Serde adapter for fields that accept [`parse_timestamp`] layouts.
pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognised timestamp \"{raw}\"")))
}
