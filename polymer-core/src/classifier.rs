//! Turns erased mapper output into a typed `Response<U>`.
//!
//! Order of the rules:
//!
//! 1. a sequence whose every element is a `U` becomes `Result(items)`;
//! 2. a single `U` becomes `Result([item])`;
//! 3. otherwise an explicit error becomes `Error(error)`;
//! 4. otherwise `Error(UnknownResponse)` carrying the raw payload.
//!
//! A usable payload wins over an accompanying error: transports may report
//! a status such as 206 next to data that is still valid.

use crate::{Mapped, PolymerError, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::trace;

/// Classify a `(payload, error)` pair. Pure; the same input always yields
/// the same output.
pub fn classify<U: DeserializeOwned>(
    mapped: Option<&Mapped>,
    error: Option<&PolymerError>,
) -> Response<U> {
    let mut mismatch = None;

    match mapped {
        Some(Mapped::Sequence(items)) => match materialize_all::<U>(items) {
            Ok(items) => {
                trace!(count = items.len(), "Classified sequence payload");
                return Response::Result(items);
            }
            Err(e) => mismatch = Some(e),
        },
        Some(Mapped::Single(value)) => match U::deserialize(value) {
            Ok(item) => {
                trace!("Classified single-object payload");
                return Response::Result(vec![item]);
            }
            Err(e) => mismatch = Some(e.to_string()),
        },
        Some(Mapped::Unmatched(_)) | None => {}
    }

    if let Some(error) = error {
        trace!(error = %error, "Classified as error");
        return Response::Error(error.clone());
    }

    let payload = mapped.map(Mapped::to_value);
    let description = mismatch.or_else(|| {
        payload.as_ref().map(|_| {
            format!(
                "payload is neither {} nor a sequence of it",
                std::any::type_name::<U>()
            )
        })
    });
    trace!(has_payload = payload.is_some(), "Classified as unknown response");
    Response::Error(PolymerError::UnknownResponse {
        payload,
        error: description,
    })
}

fn materialize_all<U: DeserializeOwned>(items: &[serde_json::Value]) -> Result<Vec<U>, String> {
    items
        .iter()
        .map(|item| U::deserialize(item).map_err(|e| e.to_string()))
        .collect()
}
