//! Mapping service: locates the sub-tree to map and sorts it by shape.
//!
//! The mapper works on erased JSON values. Whether a value "is a `U`" is
//! answered by a [`ResultShape`], which carries a monomorphized check for
//! the caller's result type.

use crate::PolymerError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// Erased description of the expected element type.
#[derive(Clone, Copy)]
pub struct ResultShape {
    type_name: &'static str,
    matches: fn(&Value) -> bool,
}

impl ResultShape {
    /// Shape of `U`: a value matches when it deserializes into `U`.
    pub fn of<U: DeserializeOwned>() -> Self {
        Self {
            type_name: std::any::type_name::<U>(),
            matches: |value: &Value| U::deserialize(value).is_ok(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn matches(&self, value: &Value) -> bool {
        (self.matches)(value)
    }
}

impl fmt::Debug for ResultShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResultShape").field(&self.type_name).finish()
    }
}

/// Mapper output, before typed materialization.
#[derive(Debug, Clone, PartialEq)]
pub enum Mapped {
    /// One value of the expected shape.
    Single(Value),
    /// An array whose every element has the expected shape, in order.
    Sequence(Vec<Value>),
    /// Anything else; kept for diagnostics.
    Unmatched(Value),
}

impl Mapped {
    /// Sort `value` by shape. A matching array wins over a matching single
    /// value, so `Vec<U>` payloads normalize to sequences.
    pub fn from_value(value: Value, shape: &ResultShape) -> Self {
        match value {
            Value::Array(items) if items.iter().all(|item| shape.matches(item)) => {
                Mapped::Sequence(items)
            }
            value if shape.matches(&value) => Mapped::Single(value),
            value => Mapped::Unmatched(value),
        }
    }

    /// The mapped value(s) as one JSON value.
    pub fn to_value(&self) -> Value {
        match self {
            Mapped::Single(value) | Mapped::Unmatched(value) => value.clone(),
            Mapped::Sequence(items) => Value::Array(items.clone()),
        }
    }
}

/// Result of a mapping pass; either side may be empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapOutcome {
    pub mapped: Option<Mapped>,
    pub error: Option<PolymerError>,
}

/// Field added to each mapped object when response headers are appended.
pub const HEADER_FIELD: &str = "Header";

/// Extracts a key path and shapes the result.
///
/// When `header` is given it is added as the [`HEADER_FIELD`] of the
/// extracted value before the shape check, so result types may declare it.
pub trait Mapper: Send + Sync {
    fn map(
        &self,
        raw: Value,
        key_path: Option<&str>,
        header: Option<&Value>,
        shape: &ResultShape,
    ) -> MapOutcome;
}

/// Default mapper: dotted key paths, numeric segments index arrays.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyPathMapper;

impl Mapper for KeyPathMapper {
    fn map(
        &self,
        raw: Value,
        key_path: Option<&str>,
        header: Option<&Value>,
        shape: &ResultShape,
    ) -> MapOutcome {
        let mut target = match key_path.filter(|path| !path.is_empty()) {
            None => raw,
            Some(path) => match take_key_path(raw, path) {
                Some(value) => value,
                None => {
                    return MapOutcome {
                        mapped: None,
                        error: Some(PolymerError::Mapping(format!(
                            "key path '{}' not found in response",
                            path
                        ))),
                    };
                }
            },
        };

        if let Some(header) = header {
            append_header(&mut target, header);
        }

        MapOutcome {
            mapped: Some(Mapped::from_value(target, shape)),
            error: None,
        }
    }
}

/// Set `header` on `value`, or on every object element when `value` is an
/// array. Other values are left alone.
pub fn append_header(value: &mut Value, header: &Value) {
    match value {
        Value::Object(map) => {
            map.insert(HEADER_FIELD.to_string(), header.clone());
        }
        Value::Array(items) => {
            for item in items {
                if let Value::Object(map) = item {
                    map.insert(HEADER_FIELD.to_string(), header.clone());
                }
            }
        }
        _ => {}
    }
}

/// Borrow the value at a dotted key path.
pub fn value_at_key_path<'a>(value: &'a Value, key_path: &str) -> Option<&'a Value> {
    key_path
        .split('.')
        .try_fold(value, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

fn take_key_path(value: Value, key_path: &str) -> Option<Value> {
    key_path
        .split('.')
        .try_fold(value, |current, segment| match current {
            Value::Object(mut map) => map.remove(segment),
            Value::Array(mut items) => {
                let index = segment.parse::<usize>().ok()?;
                (index < items.len()).then(|| items.swap_remove(index))
            }
            _ => None,
        })
}
