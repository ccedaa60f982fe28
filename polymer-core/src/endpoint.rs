//! Typed endpoint front-end.

use crate::classifier::classify;
use crate::descriptor::{self, DescribeEndpoint};
use crate::dispatcher::{CallSpec, Dispatchable, Dispatcher, ErasedCall};
use crate::mapper::ResultShape;
use crate::{Operation, PolymerError, Response, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use tracing::error;

/// A REST endpoint described by `D` whose results are `U`s.
///
/// Each verb resolves the descriptor for its operation, dispatches once and
/// hands a [`Response`] to the completion exactly once. Calls share no
/// state, so one endpoint may serve any number of concurrent calls.
/// Dropping a verb future abandons its call.
///
/// ```ignore
/// let endpoint: Endpoint<ArtistSearch, Artist> = Endpoint::new(Dispatcher::http()?)
///     .with_parameters(&json!({"q": "tania bowra", "type": "artist"}));
///
/// endpoint.get(|response| match response {
///     Response::Result(artists) => println!("{} artists", artists.len()),
///     Response::Error(err) => eprintln!("search failed: {}", err),
/// }).await;
/// ```
pub struct Endpoint<D, U> {
    describer: D,
    dispatcher: Dispatcher,
    slug: Option<Value>,
    parameters: Option<Value>,
    pending: Option<PolymerError>,
    _result: PhantomData<fn() -> U>,
}

impl<D, U> Endpoint<D, U>
where
    D: DescribeEndpoint + Default,
    U: DeserializeOwned,
{
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self::with_descriptor(dispatcher, D::default())
    }
}

impl<D, U> Endpoint<D, U>
where
    D: DescribeEndpoint,
    U: DeserializeOwned,
{
    pub fn with_descriptor(dispatcher: Dispatcher, describer: D) -> Self {
        Self {
            describer,
            dispatcher,
            slug: None,
            parameters: None,
            pending: None,
            _result: PhantomData,
        }
    }

    /// Values for the path placeholders.
    pub fn with_slug<T: Serialize + ?Sized>(mut self, slug: &T) -> Self {
        self.slug = self.capture("slug", slug);
        self
    }

    /// Query parameters for GET/DELETE, body otherwise.
    pub fn with_parameters<T: Serialize + ?Sized>(mut self, parameters: &T) -> Self {
        self.parameters = self.capture("parameters", parameters);
        self
    }

    pub fn describer(&self) -> &D {
        &self.describer
    }

    pub fn slug(&self) -> Option<&Value> {
        self.slug.as_ref()
    }

    pub fn parameters(&self) -> Option<&Value> {
        self.parameters.as_ref()
    }

    /// Build the erased call for `operation`.
    pub fn erase(&self, operation: Operation) -> Result<ErasedCall> {
        if let Some(err) = &self.pending {
            return Err(err.clone());
        }

        let descriptor = descriptor::resolve(&self.describer, operation)?;
        Ok(self.dispatcher.bind(CallSpec {
            operation,
            descriptor,
            shape: ResultShape::of::<U>(),
            slug: self.slug.clone(),
            parameters: self.parameters.clone(),
        }))
    }

    /// Dispatch `operation` and classify the outcome.
    pub async fn request(&self, operation: Operation) -> Response<U> {
        let call = match self.erase(operation) {
            Ok(call) => call,
            Err(err) => return Response::Error(err),
        };

        let outcome = call.execute().await;
        classify(outcome.mapped.as_ref(), outcome.error.as_ref())
    }

    pub async fn get<F: FnOnce(Response<U>)>(&self, completion: F) {
        completion(self.request(Operation::Get).await)
    }

    pub async fn post<F: FnOnce(Response<U>)>(&self, completion: F) {
        completion(self.request(Operation::Post).await)
    }

    pub async fn put<F: FnOnce(Response<U>)>(&self, completion: F) {
        completion(self.request(Operation::Put).await)
    }

    pub async fn patch<F: FnOnce(Response<U>)>(&self, completion: F) {
        completion(self.request(Operation::Patch).await)
    }

    pub async fn delete<F: FnOnce(Response<U>)>(&self, completion: F) {
        completion(self.request(Operation::Delete).await)
    }

    fn capture<T: Serialize + ?Sized>(&mut self, what: &str, value: &T) -> Option<Value> {
        match serde_json::to_value(value) {
            Ok(value) => Some(value),
            Err(err) => {
                error!(field = what, error = %err, "Failed to serialize endpoint input");
                self.pending = Some(PolymerError::Configuration(format!(
                    "cannot serialize {}: {}",
                    what, err
                )));
                None
            }
        }
    }
}

impl<D: fmt::Debug, U> fmt::Debug for Endpoint<D, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("describer", &self.describer)
            .field("result", &std::any::type_name::<U>())
            .field("slug", &self.slug)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EndpointDescriptor;
    use crate::transport::{Transport, TransportRequest, TransportResponse};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Issue {
        number: u64,
        title: String,
    }

    #[derive(Debug, Default)]
    struct Issues;

    impl DescribeEndpoint for Issues {
        fn describe(&self, operation: Operation) -> Result<EndpointDescriptor> {
            let path = match operation {
                Operation::Get | Operation::Post => "repos/:owner/:repo/issues",
                _ => "repos/:owner/:repo/issues/:number",
            };
            Ok(EndpointDescriptor::new("https://api.github.com", path)
                .with_nil_slug_value("number", json!(0)))
        }
    }

    struct Scripted {
        calls: Mutex<Vec<TransportRequest>>,
        response: TransportResponse,
    }

    impl Scripted {
        fn new(response: TransportResponse) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                response,
            })
        }
    }

    #[async_trait]
    impl Transport for Scripted {
        async fn execute(&self, request: TransportRequest) -> TransportResponse {
            self.calls.lock().push(request);
            self.response.clone()
        }
    }

    fn issue_json() -> Value {
        json!({"number": 7, "title": "Slug rules"})
    }

    fn issue() -> Issue {
        Issue {
            number: 7,
            title: "Slug rules".to_string(),
        }
    }

    #[tokio::test]
    async fn test_single_object_normalized_to_one_element() {
        let transport = Scripted::new(TransportResponse::ok(200, issue_json()));
        let endpoint: Endpoint<Issues, Issue> =
            Endpoint::new(Dispatcher::from_shared(transport.clone()))
                .with_slug(&json!({"owner": "rust-lang", "repo": "rust", "number": 7}));

        let response = endpoint.request(Operation::Get).await;
        assert_eq!(response, Response::Result(vec![issue()]));

        let calls = transport.calls.lock();
        assert_eq!(calls[0].url.path(), "/repos/rust-lang/rust/issues");
    }

    #[tokio::test]
    async fn test_each_verb_completes_once_with_its_method() {
        let transport = Scripted::new(TransportResponse::ok(200, json!([issue_json()])));
        let endpoint: Endpoint<Issues, Issue> =
            Endpoint::new(Dispatcher::from_shared(transport.clone()))
                .with_slug(&json!({"owner": "rust-lang", "repo": "rust", "number": 7}));

        let completions = Mutex::new(Vec::new());
        endpoint.get(|r| completions.lock().push(("GET", r))).await;
        endpoint.post(|r| completions.lock().push(("POST", r))).await;
        endpoint.put(|r| completions.lock().push(("PUT", r))).await;
        endpoint.patch(|r| completions.lock().push(("PATCH", r))).await;
        endpoint.delete(|r| completions.lock().push(("DELETE", r))).await;

        let completions = completions.into_inner();
        assert_eq!(completions.len(), 5);
        for (_, response) in &completions {
            assert_eq!(response.items(), Some(&[issue()][..]));
        }

        let methods: Vec<_> = transport
            .calls
            .lock()
            .iter()
            .map(|request| request.method.to_string())
            .collect();
        let expected: Vec<_> = completions.iter().map(|(m, _)| m.to_string()).collect();
        assert_eq!(methods, expected);
        assert_eq!(
            transport.calls.lock()[3].url.path(),
            "/repos/rust-lang/rust/issues/7"
        );
    }

    #[tokio::test]
    async fn test_rejected_slug_never_reaches_transport() {
        let transport = Scripted::new(TransportResponse::ok(200, issue_json()));
        let descriptor = EndpointDescriptor::new("https://api.github.com", "users/:login")
            .with_slug_validity_check(|value, _| value.as_str().is_some_and(|s| !s.is_empty()));
        let endpoint: Endpoint<EndpointDescriptor, Issue> =
            Endpoint::with_descriptor(Dispatcher::from_shared(transport.clone()), descriptor)
                .with_slug(&json!({"login": ""}));

        let response = endpoint.request(Operation::Get).await;
        assert!(matches!(
            response.error(),
            Some(PolymerError::InvalidSlug { path, .. }) if path == "login"
        ));
        assert!(transport.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_describe_failure_is_configuration_error() {
        #[derive(Default)]
        struct Broken;

        impl DescribeEndpoint for Broken {
            fn describe(&self, _operation: Operation) -> Result<EndpointDescriptor> {
                Err(PolymerError::Mapping("no descriptor".to_string()))
            }
        }

        let transport = Scripted::new(TransportResponse::default());
        let endpoint: Endpoint<Broken, Issue> =
            Endpoint::new(Dispatcher::from_shared(transport.clone()));

        let response = endpoint.request(Operation::Get).await;
        assert!(matches!(
            response.error(),
            Some(PolymerError::Configuration(_))
        ));
        assert!(transport.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_unserializable_parameters_reported_at_dispatch() {
        let transport = Scripted::new(TransportResponse::default());
        let mut bad = BTreeMap::new();
        bad.insert(vec![1u8], "tuple keys are not strings");

        let endpoint: Endpoint<Issues, Issue> =
            Endpoint::new(Dispatcher::from_shared(transport.clone())).with_parameters(&bad);
        assert!(endpoint.parameters().is_none());

        let response = endpoint.request(Operation::Post).await;
        assert!(matches!(
            response.error(),
            Some(PolymerError::Configuration(_))
        ));
        assert!(transport.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_empty_outcome_is_unknown_response() {
        let transport = Scripted::new(TransportResponse {
            status: Some(204),
            ..TransportResponse::default()
        });
        let endpoint: Endpoint<Issues, Issue> =
            Endpoint::new(Dispatcher::from_shared(transport))
                .with_slug(&json!({"owner": "a", "repo": "b"}));

        let response = endpoint.request(Operation::Delete).await;
        assert_eq!(
            response.error(),
            Some(&PolymerError::UnknownResponse {
                payload: None,
                error: None,
            })
        );
    }

    #[tokio::test]
    async fn test_concurrent_calls_share_one_endpoint() {
        let transport = Scripted::new(TransportResponse::ok(200, issue_json()));
        let endpoint: Endpoint<Issues, Issue> =
            Endpoint::new(Dispatcher::from_shared(transport.clone()))
                .with_slug(&json!({"owner": "a", "repo": "b", "number": 7}));

        let (first, second) = tokio::join!(
            endpoint.request(Operation::Get),
            endpoint.request(Operation::Patch)
        );
        assert!(first.is_result());
        assert!(second.is_result());
        assert_eq!(transport.calls.lock().len(), 2);
    }
}
