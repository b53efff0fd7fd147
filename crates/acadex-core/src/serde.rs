//! Custom serde helpers for query-string parsing.

use serde::{Deserialize, Deserializer};

/// Deserialize an optional boolean flag from query strings, accepting the
/// forms `1`/`0`, `true`/`false`, and the bare empty value (`?all=`).
pub fn deserialize_optional_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref() {
        None | Some("") => Ok(None),
        Some("1") | Some("true") => Ok(Some(true)),
        Some("0") | Some("false") => Ok(Some(false)),
        Some(other) => Err(serde::de::Error::custom(format!(
            "invalid boolean flag: {}",
            other
        ))),
    }
}
