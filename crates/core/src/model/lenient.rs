//! Field deserializers that tolerate `null` and mistyped values.
//!
//! A bad value falls back to the field's default (or drops one element of a list) so the
//! rest of the record still loads.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

fn decode_or_default<T: DeserializeOwned + Default>(value: Value) -> T {
    if value.is_null() {
        return T::default();
    }
    serde_json::from_value(value).unwrap_or_else(|e| {
        debug!("Ignoring {} value: {}", std::any::type_name::<T>(), e);
        T::default()
    })
}

/// `null` or a value of the wrong shape reads as `T::default()`.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decode_or_default(value))
}

/// A list whose `null` or undecodable elements are dropped. Anything but an array is empty.
pub fn seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter(|item| !item.is_null())
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                debug!("Dropping {} element: {}", std::any::type_name::<T>(), e);
                None
            }
        })
        .collect())
}

/// Id-keyed slots, from either a JSON object (`{"1": {...}}`) or an array indexed by id.
///
/// `null` and undecodable slots are kept as `None`; keys that are not ids are dropped.
pub fn slots<'de, D, T>(deserializer: D) -> Result<BTreeMap<u32, Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries: Vec<(u32, Value)> = match Value::deserialize(deserializer)? {
        Value::Object(map) => map
            .into_iter()
            .filter_map(|(key, value)| Some((key.parse().ok()?, value)))
            .collect(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| Some((u32::try_from(index).ok()?, value)))
            .collect(),
        _ => Vec::new(),
    };

    Ok(entries
        .into_iter()
        .map(|(id, value)| {
            let slot = if value.is_null() {
                None
            } else {
                serde_json::from_value(value)
                    .map_err(|e| debug!("Dropping slot {}: {}", id, e))
                    .ok()
            };
            (id, slot)
        })
        .collect())
}
