//! Date/time wire format helpers
//!
//! Every timestamp crossing the HTTP boundary uses the `yyyy-MM-dd HH:mm:ss`
//! format. These helpers convert between that format and `DateTime<Utc>`.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::utils::errors::{ExploreError, Result};

pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a wire-format timestamp, treating it as UTC
pub fn parse_date_time(value: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| ExploreError::InvalidInput(format!("Invalid date/time '{value}': {e}")))
}

/// Format a timestamp for the wire
pub fn format_date_time(value: DateTime<Utc>) -> String {
    value.format(DATE_TIME_FORMAT).to_string()
}

/// serde adapter for mandatory wire-format timestamps
pub mod serde_format {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::DATE_TIME_FORMAT;

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(DATE_TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, DATE_TIME_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}

/// serde adapter for optional wire-format timestamps
pub mod serde_format_opt {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::DATE_TIME_FORMAT;

    pub fn serialize<S>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(value) => serializer.serialize_str(&value.format(DATE_TIME_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            Some(raw) => NaiveDateTime::parse_from_str(&raw, DATE_TIME_FORMAT)
                .map(|naive| Some(naive.and_utc()))
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_and_format_round_trip() {
        let parsed = parse_date_time("2025-06-01 12:30:00").unwrap();
        assert_eq!(format_date_time(parsed), "2025-06-01 12:30:00");
    }

    #[test]
    fn test_parse_rejects_iso_format() {
        let result = parse_date_time("2025-06-01T12:30:00");
        assert_matches!(result, Err(ExploreError::InvalidInput(_)));
    }
}
