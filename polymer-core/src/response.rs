//! The typed result of an endpoint call.

use crate::PolymerError;

/// Outcome of one endpoint call: exactly one of a sequence of results or
/// an error.
///
/// Single-object payloads arrive as a one-element sequence, so callers never
/// branch on "one or many".
#[derive(Debug, Clone, PartialEq)]
pub enum Response<U> {
    Result(Vec<U>),
    Error(PolymerError),
}

impl<U> Response<U> {
    pub fn is_result(&self) -> bool {
        matches!(self, Response::Result(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error(_))
    }

    /// The items, if this is a result.
    pub fn items(&self) -> Option<&[U]> {
        match self {
            Response::Result(items) => Some(items),
            Response::Error(_) => None,
        }
    }

    /// The error, if this is an error.
    pub fn error(&self) -> Option<&PolymerError> {
        match self {
            Response::Result(_) => None,
            Response::Error(err) => Some(err),
        }
    }

    pub fn into_result(self) -> crate::Result<Vec<U>> {
        match self {
            Response::Result(items) => Ok(items),
            Response::Error(err) => Err(err),
        }
    }

    /// Transform the items, keeping errors.
    pub fn map<V>(self, f: impl FnMut(U) -> V) -> Response<V> {
        match self {
            Response::Result(items) => Response::Result(items.into_iter().map(f).collect()),
            Response::Error(err) => Response::Error(err),
        }
    }
}

impl<U> From<Response<U>> for crate::Result<Vec<U>> {
    fn from(response: Response<U>) -> Self {
        response.into_result()
    }
}
