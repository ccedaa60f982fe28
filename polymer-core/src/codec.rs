//! Request and response body codecs.
//!
//! Absent a descriptor override, requests are written as JSON and responses
//! are read as JSON with a UTF-8 text fallback.

use crate::{PolymerError, Result};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Encodes request parameters into a body.
pub trait RequestCodec: Send + Sync + fmt::Debug {
    /// Value for the `Content-Type` header.
    fn content_type(&self) -> &str;

    fn encode(&self, parameters: &Value) -> Result<Vec<u8>>;
}

/// Decodes a response body into a mappable value.
pub trait ResponseCodec: Send + Sync + fmt::Debug {
    /// Decode a non-empty body. `content_type` is the mime essence, if the
    /// response declared one.
    fn decode(&self, body: &[u8], content_type: Option<&str>) -> Result<Value>;
}

/// Shared request codec handle.
pub type SharedRequestCodec = Arc<dyn RequestCodec>;
/// Shared response codec handle.
pub type SharedResponseCodec = Arc<dyn ResponseCodec>;

/// JSON in both directions.
///
/// Decoding falls back to the body's UTF-8 text when it is not JSON, so raw
/// string payloads still reach the response transformer.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    strict: bool,
}

impl JsonCodec {
    /// A decoder that fails instead of falling back to text.
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

impl RequestCodec for JsonCodec {
    fn content_type(&self) -> &str {
        "application/json"
    }

    fn encode(&self, parameters: &Value) -> Result<Vec<u8>> {
        serde_json::to_vec(parameters).map_err(|e| PolymerError::Configuration(e.to_string()))
    }
}

impl ResponseCodec for JsonCodec {
    fn decode(&self, body: &[u8], _content_type: Option<&str>) -> Result<Value> {
        match serde_json::from_slice(body) {
            Ok(value) => Ok(value),
            Err(e) if self.strict => Err(PolymerError::transport(format!(
                "response is not valid JSON: {}",
                e
            ))),
            Err(_) => TextCodec.decode(body, None),
        }
    }
}

/// `application/x-www-form-urlencoded` request bodies.
///
/// Only flat objects of scalars can be encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormCodec;

impl RequestCodec for FormCodec {
    fn content_type(&self) -> &str {
        "application/x-www-form-urlencoded"
    }

    fn encode(&self, parameters: &Value) -> Result<Vec<u8>> {
        let Value::Object(map) = parameters else {
            return Err(PolymerError::Configuration(
                "form bodies require object parameters".to_string(),
            ));
        };
        let mut pairs = Vec::with_capacity(map.len());
        for (key, value) in map {
            let text = crate::query::scalar_text(value).ok_or_else(|| {
                PolymerError::Configuration(format!("form field '{}' is not a scalar", key))
            })?;
            pairs.push((key.as_str(), text));
        }
        serde_urlencoded::to_string(&pairs)
            .map(String::into_bytes)
            .map_err(|e| PolymerError::Configuration(e.to_string()))
    }
}

/// Body as a JSON string, for text endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl ResponseCodec for TextCodec {
    fn decode(&self, body: &[u8], _content_type: Option<&str>) -> Result<Value> {
        std::str::from_utf8(body)
            .map(|text| Value::String(text.to_string()))
            .map_err(|e| PolymerError::transport(format!("response body is not UTF-8: {}", e)))
    }
}

pub(crate) fn default_request_codec() -> SharedRequestCodec {
    Arc::new(JsonCodec::default())
}

pub(crate) fn default_response_codec() -> SharedResponseCodec {
    Arc::new(JsonCodec::default())
}
