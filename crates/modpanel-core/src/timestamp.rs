//! Lenient timestamp decoding.
//!
//! The panel API hands out timestamps either as RFC 3339 strings or as epoch
//! milliseconds. Anything else decodes to `None` instead of failing the whole
//! record, so a single bad modification never hides a player's history.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serializer};

pub type Timestamp = DateTime<Utc>;

/// Parse a textual timestamp. Accepts RFC 3339 and naive ISO-8601 (assumed UTC).
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Convert epoch milliseconds. Non-finite values have no timestamp.
pub fn from_millis(ms: f64) -> Option<Timestamp> {
    if !ms.is_finite() {
        return None;
    }
    Utc.timestamp_millis_opt(ms as i64).single()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TimestampInput {
    Text(String),
    Number(f64),
    Other(serde_json::Value),
}

impl TimestampInput {
    fn into_timestamp(self) -> Option<Timestamp> {
        match self {
            TimestampInput::Text(raw) => parse_timestamp(&raw),
            TimestampInput::Number(ms) => from_millis(ms),
            TimestampInput::Other(_) => None,
        }
    }
}

/// `#[serde(with = "timestamp::lenient")]` for `Option<Timestamp>` fields.
pub mod lenient {
    use super::*;

    pub fn serialize<S>(value: &Option<Timestamp>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&ts.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<TimestampInput>::deserialize(deserializer)?.and_then(TimestampInput::into_timestamp))
    }
}
