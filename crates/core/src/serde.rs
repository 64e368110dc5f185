//! Serde helpers for the quirks of the hosted store's row encoding.
//!
//! The store returns `time` columns as `HH:MM:SS` while forms send `HH:MM`,
//! and text columns cleared in a form come back as empty strings.

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serializer};

/// Parses a time of day in `HH:MM` or `HH:MM:SS` form.
pub fn parse_time(s: &str) -> Result<NaiveTime, chrono::ParseError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M").or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
}

/// (De)serializes a `NaiveTime` as `HH:MM:SS`, accepting `HH:MM` on input.
pub mod time_of_day {
    use super::*;

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M:%S").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_time(&s).map_err(serde::de::Error::custom)
    }
}

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}
