//! # Polymer HTTP Client
//!
//! The network transport behind Polymer endpoints: a thin, configurable
//! wrapper over `reqwest` that buffers whole responses so the dispatcher can
//! inspect status, headers and body together.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use polymer_http_client::{HttpClient, HttpClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpClient::new(HttpClientConfig::default())?;
//!
//!     let response = client
//!         .get("https://api.spotify.com/v1/search")
//!         .query("q", "beyonce")
//!         .query("type", "artist")
//!         .send()
//!         .await?;
//!
//!     println!("Status: {}", response.status());
//!     Ok(())
//! }
//! ```
//!
//! ## Configured Client
//!
//! ```rust,no_run
//! use polymer_http_client::{HttpClient, HttpClientConfig};
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpClientConfig::builder()
//!     .timeout(Duration::from_secs(15))
//!     .default_header("X-Client", "polymer")
//!     .build();
//!
//! let client = HttpClient::new(config)?;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;

pub use client::HttpClient;
pub use config::{HttpClientConfig, HttpClientConfigBuilder};
pub use error::{HttpClientError, Result};
pub use request::RequestBuilder;
pub use response::Response;

// Re-export common types
pub use bytes::Bytes;
pub use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
pub use url::Url;

/// Prelude for common imports.
///
/// ```
/// use polymer_http_client::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::HttpClient;
    pub use crate::config::{HttpClientConfig, HttpClientConfigBuilder};
    pub use crate::error::{HttpClientError, Result};
    pub use crate::request::RequestBuilder;
    pub use crate::response::Response;
    pub use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
}
