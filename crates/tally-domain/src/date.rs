//! Calendar-date parsing and formatting for transaction dates.
//!
//! The backend may hand dates back as plain `YYYY-MM-DD` strings or as full
//! timestamps. Everything the client keeps or sends is a plain calendar date.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a date as typed by a user: strictly `YYYY-MM-DD`.
pub fn parse_input_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Parses a date as returned by the backend.
///
/// RFC 3339 timestamps are converted to their UTC calendar date; naive
/// timestamps are truncated to their date part.
pub fn parse_wire_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Some(date) = parse_input_date(trimmed) {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(stamp.with_timezone(&Utc).date_naive());
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|stamp| stamp.date())
}

/// Renders a date the way the form and the table display it.
pub fn format_date_for_input(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Serde adapter: lenient on input, always `YYYY-MM-DD` on output.
pub mod iso_date {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_date_for_input(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_wire_date(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid date `{raw}`")))
    }
}
