//! Type-erased dispatch.
//!
//! [`Dispatcher`] owns the transport and mapper; [`ErasedCall`] is the
//! non-generic unit of work built for a single verb invocation.

use crate::codec::{default_request_codec, default_response_codec};
use crate::mapper::{KeyPathMapper, MapOutcome, Mapped, Mapper, ResultShape};
use crate::transport::{Transport, TransportRequest, TransportResponse};
use crate::{EndpointDescriptor, Operation, PolymerError, Result, query, slug};
use async_trait::async_trait;
use polymer_http_client::{HttpClient, HttpClientConfig};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Untyped result of one dispatch, ready for classification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawOutcome {
    pub status: Option<u16>,
    pub mapped: Option<Mapped>,
    pub error: Option<PolymerError>,
}

impl RawOutcome {
    fn failed(error: PolymerError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }
}

/// A unit of work that can be executed without knowing the result type.
#[async_trait]
pub trait Dispatchable: Send + Sync {
    async fn execute(&self) -> RawOutcome;
}

/// Everything a single call needs, captured at the call site.
#[derive(Debug, Clone)]
pub struct CallSpec {
    pub operation: Operation,
    pub descriptor: EndpointDescriptor,
    pub shape: ResultShape,
    pub slug: Option<Value>,
    pub parameters: Option<Value>,
}

/// Shared dispatch machinery. Cheap to clone.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    mapper: Arc<dyn Mapper>,
}

impl Dispatcher {
    /// Dispatch through `transport` with the default key-path mapper.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::from_shared(Arc::new(transport))
    }

    pub fn from_shared(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            mapper: Arc::new(KeyPathMapper),
        }
    }

    /// Dispatch over HTTP with a default client.
    pub fn http() -> Result<Self> {
        Self::with_http_config(HttpClientConfig::default())
    }

    /// Dispatch over HTTP with a configured client.
    pub fn with_http_config(config: HttpClientConfig) -> Result<Self> {
        Ok(Self::new(HttpClient::new(config)?))
    }

    /// Replace the mapper.
    pub fn with_mapper(mut self, mapper: impl Mapper + 'static) -> Self {
        self.mapper = Arc::new(mapper);
        self
    }

    /// Bind a call to this dispatcher.
    pub fn bind(&self, spec: CallSpec) -> ErasedCall {
        ErasedCall {
            dispatcher: self.clone(),
            spec,
        }
    }

    async fn run(&self, spec: &CallSpec) -> RawOutcome {
        let request = match prepare(spec) {
            Ok(request) => request,
            Err(err) => {
                warn!(
                    operation = %spec.operation,
                    path = spec.descriptor.path(),
                    error = %err,
                    "Endpoint call rejected before dispatch"
                );
                return RawOutcome::failed(err);
            }
        };

        debug!(
            operation = %spec.operation,
            url = %request.url,
            "Dispatching endpoint call"
        );

        let response = self.transport.execute(request).await;

        debug!(
            status = ?response.status,
            has_body = response.body.is_some(),
            has_error = response.error.is_some(),
            "Endpoint call completed"
        );

        self.finish(spec, response)
    }

    fn finish(&self, spec: &CallSpec, response: TransportResponse) -> RawOutcome {
        let TransportResponse {
            status,
            headers,
            body,
            error,
        } = response;

        let Some(body) = body else {
            return RawOutcome {
                status,
                mapped: None,
                error,
            };
        };

        let body = match spec.descriptor.response_transformer() {
            Some(transform) => match transform(body) {
                Ok(body) => body,
                Err(err) => {
                    return RawOutcome {
                        status,
                        mapped: None,
                        error: error.or(Some(err)),
                    };
                }
            },
            None => body,
        };

        let header = (spec.descriptor.append_header_to_response() && !headers.is_empty())
            .then(|| header_object(&headers));

        let MapOutcome {
            mapped,
            error: mapping_error,
        } = self.mapper.map(
            body,
            spec.descriptor.response_key_path(),
            header.as_ref(),
            &spec.shape,
        );

        RawOutcome {
            status,
            mapped,
            error: error.or(mapping_error),
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

/// A bound, non-generic call. Built fresh for every verb invocation.
#[derive(Debug)]
pub struct ErasedCall {
    dispatcher: Dispatcher,
    spec: CallSpec,
}

impl ErasedCall {
    pub fn spec(&self) -> &CallSpec {
        &self.spec
    }
}

#[async_trait]
impl Dispatchable for ErasedCall {
    async fn execute(&self) -> RawOutcome {
        self.dispatcher.run(&self.spec).await
    }
}

fn prepare(spec: &CallSpec) -> Result<TransportRequest> {
    let descriptor = &spec.descriptor;
    let mut url = slug::resolve_url(descriptor, spec.slug.as_ref())?;

    let mut body = None;
    if let Some(parameters) = &spec.parameters {
        if !matches!(parameters, Value::Object(_) | Value::Array(_)) {
            return Err(PolymerError::Configuration(format!(
                "parameters must be an object or an array, got {}",
                parameters
            )));
        }

        if spec.operation.parameters_in_query() {
            let pairs = query::query_pairs(parameters)?;
            if !pairs.is_empty() {
                url.query_pairs_mut().extend_pairs(pairs);
            }
        } else {
            body = Some(parameters.clone());
        }
    }

    Ok(TransportRequest {
        method: spec.operation.method(),
        url,
        headers: descriptor.header_fields().cloned().unwrap_or_default(),
        content_types: descriptor.acceptable_content_types().cloned(),
        body,
        request_codec: descriptor
            .request_codec()
            .cloned()
            .unwrap_or_else(default_request_codec),
        response_codec: descriptor
            .response_codec()
            .cloned()
            .unwrap_or_else(default_response_codec),
    })
}

fn header_object(headers: &BTreeMap<String, String>) -> Value {
    Value::Object(
        headers
            .iter()
            .map(|(name, value)| (name.clone(), Value::String(value.clone())))
            .collect::<Map<String, Value>>(),
    )
}
