//! Error taxonomy for endpoint calls.
//!
//! Every failure reaches the caller as `Response::Error`, so the error type
//! is plain data: cloneable and comparable, with foreign errors flattened to
//! their message at the boundary.

use polymer_http_client::HttpClientError;
use serde_json::Value;
use thiserror::Error;

/// Result type for fallible steps inside the core.
pub type Result<T> = std::result::Result<T, PolymerError>;

/// Errors produced while dispatching an endpoint call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolymerError {
    /// Base URL, path or parameters could not form a request.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A slug value was rejected by the descriptor's validity check.
    #[error("Invalid slug value {value} for ':{path}'")]
    InvalidSlug {
        /// Placeholder name without the leading colon.
        path: String,
        /// The rejected value.
        value: Value,
    },

    /// The transport failed or reported a non-success status.
    #[error("Transport error{}: {message}", .status.map(|s| format!(" ({})", s)).unwrap_or_default())]
    Transport {
        /// HTTP status, when a response was received.
        status: Option<u16>,
        /// Error message.
        message: String,
    },

    /// The payload could not be materialized into the target shape.
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// A payload was present but matched neither a single object nor a
    /// sequence, and no explicit error accompanied it.
    #[error("Unknown response: payload {payload:?}, error {error:?}")]
    UnknownResponse {
        /// Raw payload, kept for diagnosis.
        payload: Option<Value>,
        /// Description of the raw error or shape mismatch, if any.
        error: Option<String>,
    },
}

impl PolymerError {
    /// Shorthand for a transport error without a status.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Check if this error came from the transport.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if this is an unclassifiable response.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::UnknownResponse { .. })
    }

    /// HTTP status code carried by a transport error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<HttpClientError> for PolymerError {
    fn from(err: HttpClientError) -> Self {
        match err {
            HttpClientError::InvalidUrl(message) => Self::Configuration(message),
            HttpClientError::UrlParse(e) => Self::Configuration(e.to_string()),
            other => Self::Transport {
                status: other.status_code(),
                message: other.to_string(),
            },
        }
    }
}
