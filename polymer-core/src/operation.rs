//! HTTP verbs an endpoint can be invoked with.

use http::Method;
use std::fmt;

/// The verb in flight for one endpoint call.
///
/// Passed by value through descriptor resolution and dispatch; nothing
/// stores it between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Operation {
    /// All verbs, in declaration order.
    pub const ALL: [Operation; 5] = [
        Operation::Get,
        Operation::Post,
        Operation::Put,
        Operation::Patch,
        Operation::Delete,
    ];

    pub fn method(self) -> Method {
        match self {
            Operation::Get => Method::GET,
            Operation::Post => Method::POST,
            Operation::Put => Method::PUT,
            Operation::Patch => Method::PATCH,
            Operation::Delete => Method::DELETE,
        }
    }

    /// Whether parameters travel in the query string rather than the body.
    pub fn parameters_in_query(self) -> bool {
        matches!(self, Operation::Get | Operation::Delete)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Get => "GET",
            Operation::Post => "POST",
            Operation::Put => "PUT",
            Operation::Patch => "PATCH",
            Operation::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
