//! Query-string encoding of endpoint parameters.
//!
//! Nested values use bracket notation: arrays as `key[]=v`, objects as
//! `key[sub]=v`. `null` values are skipped.

use crate::{PolymerError, Result};
use serde_json::Value;

/// Text form of a scalar, or `None` for arrays, objects and null.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Flatten object parameters into ordered query pairs.
pub fn query_pairs(parameters: &Value) -> Result<Vec<(String, String)>> {
    let Value::Object(map) = parameters else {
        return Err(PolymerError::Configuration(
            "query parameters must be an object".to_string(),
        ));
    };

    let mut pairs = Vec::new();
    for (key, value) in map {
        flatten(key.clone(), value, &mut pairs);
    }
    Ok(pairs)
}

fn flatten(key: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            let key = format!("{}[]", key);
            for item in items {
                flatten(key.clone(), item, pairs);
            }
        }
        Value::Object(map) => {
            for (sub, item) in map {
                flatten(format!("{}[{}]", key, sub), item, pairs);
            }
        }
        scalar => {
            if let Some(text) = scalar_text(scalar) {
                pairs.push((key, text));
            }
        }
    }
}
