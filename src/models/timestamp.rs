//! Lenient timestamp decoding for the remote state document.
//!
//! The bot backend serializes UTC instants without an offset
//! (`2024-05-01T12:00:00.123456`), while other fields may arrive as RFC 3339
//! or as unix seconds/milliseconds.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Deserialize an optional timestamp. Unparseable values decode as `None`
/// rather than failing the whole snapshot.
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(parse_value))
}

pub fn parse_value(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::String(s) => parse_str(s),
        serde_json::Value::Number(n) => from_unix(n.as_i64()?),
        _ => None,
    }
}

pub fn parse_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    s.parse::<i64>().ok().and_then(from_unix)
}

fn from_unix(secs: i64) -> Option<DateTime<Utc>> {
    // If >1e12, it's milliseconds
    if secs > 1_000_000_000_000 {
        DateTime::from_timestamp(secs / 1000, ((secs % 1000) * 1_000_000) as u32)
    } else {
        DateTime::from_timestamp(secs, 0)
    }
}
