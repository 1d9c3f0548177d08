//! Serde helpers for request payloads and query strings.
//!
//! Query strings and JSON bodies from browser clients frequently carry empty
//! strings where a value is simply absent; these helpers fold those into `None`.

use serde::{Deserialize, Deserializer};

/// Deserialize an optional string, trimming it and treating blank values as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

/// Deserialize an optional signed integer from a query-string value.
///
/// Blank values become None; anything else must parse as `i64`.
pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if !s.trim().is_empty() => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("expected an integer, got '{s}'"))),
        _ => Ok(None),
    }
}
