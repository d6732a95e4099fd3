//! Tolerant `deserialize_with` helpers for per-area fields.
//!
//! A value of the wrong shape becomes `None` (or `T::default()` for list
//! elements) instead of failing the whole document. The transformer then
//! reports the gap against the one outage area it belongs to.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Deserializes `T`, yielding `None` for `null` or any mismatched shape.
///
/// # Errors
///
/// Only fails if the input is not valid JSON at all.
pub fn option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Deserializes a list element by element. Elements of the wrong shape
/// become `T::default()`; a `null` or non-list value yields `None`.
///
/// # Errors
///
/// Only fails if the input is not valid JSON at all.
pub fn elements<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let serde_json::Value::Array(items) = serde_json::Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(Some(
        items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect(),
    ))
}

/// Deserializes a required list whose elements are each tolerant: an
/// element of the wrong shape becomes `T::default()`.
///
/// # Errors
///
/// Fails if the value is not a list.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(Vec::<serde_json::Value>::deserialize(deserializer)?
        .into_iter()
        .map(|item| serde_json::from_value(item).unwrap_or_default())
        .collect())
}
