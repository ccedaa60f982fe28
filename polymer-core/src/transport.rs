//! Transport contract and the reqwest-backed implementation.

use crate::codec::{SharedRequestCodec, SharedResponseCodec};
use crate::PolymerError;
use async_trait::async_trait;
use http::Method;
use polymer_http_client::{HttpClient, Response};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;
use url::Url;

/// A fully resolved request handed to the transport.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    /// Final URL, query string included.
    pub url: Url,
    pub headers: BTreeMap<String, String>,
    /// Sent as `Accept` and enforced on the response when present.
    pub content_types: Option<BTreeSet<String>>,
    /// Body parameters, encoded with `request_codec`.
    pub body: Option<Value>,
    pub request_codec: SharedRequestCodec,
    pub response_codec: SharedResponseCodec,
}

/// What came back. `body` and `error` may both be present: a 4xx with a
/// JSON body reports the status as an error and still returns the body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportResponse {
    pub status: Option<u16>,
    /// Lowercased header names.
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
    pub error: Option<PolymerError>,
}

impl TransportResponse {
    /// A response carrying only a body.
    pub fn ok(status: u16, body: Value) -> Self {
        Self {
            status: Some(status),
            body: Some(body),
            ..Self::default()
        }
    }

    /// A response carrying only an error.
    pub fn failed(error: PolymerError) -> Self {
        Self {
            status: error.status_code(),
            error: Some(error),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_error(mut self, error: PolymerError) -> Self {
        self.error = Some(error);
        self
    }
}

/// Performs the network call for a dispatched endpoint.
///
/// This is the only suspension point of a call. Implementations never
/// fail outright; every failure is reported in `TransportResponse::error`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: TransportRequest) -> TransportResponse;
}

#[async_trait]
impl Transport for HttpClient {
    async fn execute(&self, request: TransportRequest) -> TransportResponse {
        let mut builder = self.request(request.method.clone(), request.url.as_str());

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(types) = &request.content_types {
            builder = builder.accept(types);
        }
        if let Some(body) = &request.body {
            match request.request_codec.encode(body) {
                Ok(bytes) => {
                    builder = builder.body_with_type(bytes, request.request_codec.content_type());
                }
                Err(e) => return TransportResponse::failed(e),
            }
        }

        match builder.send().await {
            Ok(response) => read_response(&response, &request),
            Err(e) => TransportResponse::failed(e.into()),
        }
    }
}

fn read_response(response: &Response, request: &TransportRequest) -> TransportResponse {
    let status = response.status();
    let mime = response.mime_essence();
    let mut outcome = TransportResponse {
        status: Some(status.as_u16()),
        headers: response.header_map(),
        ..TransportResponse::default()
    };

    let mut errors = Vec::new();
    if !status.is_success() {
        errors.push(PolymerError::Transport {
            status: Some(status.as_u16()),
            message: status
                .canonical_reason()
                .unwrap_or("unsuccessful status")
                .to_string(),
        });
    }

    let bytes = response.bytes();
    if let Some(types) = &request.content_types
        && !bytes.is_empty()
        && !mime.as_ref().is_some_and(|m| types.contains(m))
    {
        errors.push(PolymerError::Transport {
            status: Some(status.as_u16()),
            message: format!(
                "unacceptable content type {}",
                mime.as_deref().unwrap_or("(none)")
            ),
        });
    }

    if !bytes.is_empty() {
        match request.response_codec.decode(bytes, mime.as_deref()) {
            Ok(value) => outcome.body = Some(value),
            Err(e) => errors.push(e),
        }
    }

    trace!(
        status = status.as_u16(),
        has_body = outcome.body.is_some(),
        errors = errors.len(),
        "Transport response read"
    );

    outcome.error = errors.into_iter().next();
    outcome
}
