// Mock transport for testing

use async_trait::async_trait;
use parking_lot::Mutex;
use polymer_core::{
    Dispatcher, MapOutcome, Mapped, Mapper, PolymerError, ResultShape, Transport,
    TransportRequest, TransportResponse,
};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Default)]
struct State {
    scripted: VecDeque<TransportResponse>,
    fallback: Option<TransportResponse>,
    requests: Vec<TransportRequest>,
}

/// Transport that replays scripted responses and records every request.
///
/// Responses are served first in, first out. Once the script runs dry the
/// fallback is served; without one, calls fail with a transport error.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<State>>,
}

impl MockTransport {
    /// Create a mock with an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that always answers with `response`
    pub fn always(response: TransportResponse) -> Self {
        let mock = Self::new();
        mock.state.lock().fallback = Some(response);
        mock
    }

    /// Queue a response
    pub fn push_response(&self, response: TransportResponse) -> &Self {
        self.state.lock().scripted.push_back(response);
        self
    }

    /// A dispatcher sending through this mock
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.clone())
    }

    /// Get the number of calls
    pub fn call_count(&self) -> usize {
        self.state.lock().requests.len()
    }

    /// Get all recorded requests
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.state.lock().requests.clone()
    }

    /// Get the most recent request
    pub fn last_request(&self) -> Option<TransportRequest> {
        self.state.lock().requests.last().cloned()
    }

    /// Clear recorded requests and the script
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.scripted.clear();
        state.requests.clear();
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: TransportRequest) -> TransportResponse {
        let mut state = self.state.lock();
        state.requests.push(request);

        match state.scripted.pop_front() {
            Some(response) => response,
            None => state.fallback.clone().unwrap_or_else(|| {
                TransportResponse::failed(PolymerError::transport("no scripted response"))
            }),
        }
    }
}

/// Mapper that ignores the payload and returns a fixed outcome.
///
/// Stands in for the mapping service when a test needs an exact
/// `(mapped, error)` pair.
#[derive(Debug, Clone, Default)]
pub struct FixedMapper {
    outcome: MapOutcome,
    seen: Arc<Mutex<Vec<(Value, Option<String>)>>>,
}

impl FixedMapper {
    /// Create a mapper with the given outcome
    pub fn new(mapped: Option<Mapped>, error: Option<PolymerError>) -> Self {
        Self {
            outcome: MapOutcome { mapped, error },
            seen: Arc::default(),
        }
    }

    /// Get every `(raw, key_path)` pair this mapper was called with
    pub fn calls(&self) -> Vec<(Value, Option<String>)> {
        self.seen.lock().clone()
    }
}

impl Mapper for FixedMapper {
    fn map(
        &self,
        raw: Value,
        key_path: Option<&str>,
        _header: Option<&Value>,
        _shape: &ResultShape,
    ) -> MapOutcome {
        self.seen.lock().push((raw, key_path.map(str::to_string)));
        self.outcome.clone()
    }
}
