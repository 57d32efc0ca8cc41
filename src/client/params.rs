//! Request parameter shaping.

use serde::Serialize;
use serde_json::{Map, Value};

/// Serialize `params` to a JSON object with null fields removed.
///
/// Non-object values (unit, sequences) produce an empty map.
pub fn remove_empty<P>(params: &P) -> Result<Map<String, Value>, serde_json::Error>
where
    P: Serialize + ?Sized,
{
    match serde_json::to_value(params)? {
        Value::Object(map) => Ok(map.into_iter().filter(|(_, v)| !v.is_null()).collect()),
        _ => Ok(Map::new()),
    }
}

/// Flatten a parameter map into query-string pairs.
///
/// Strings are sent verbatim; other scalars and nested values use their JSON
/// rendering.
pub fn to_query_pairs(params: &Map<String, Value>) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), value)
        })
        .collect()
}
