//! Testing utilities for Polymer endpoints.
//!
//! ## Features
//!
//! - **MockTransport** - Scripted responses and recorded requests
//! - **Assertions** - Checks for responses and recorded requests
//!
//! ## Quick Start
//!
//! ```
//! use polymer_core::prelude::*;
//! use polymer_testing::*;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let transport = MockTransport::new();
//! transport.push_response(TransportResponse::ok(200, json!([{"id": 1}, {"id": 2}])));
//!
//! let descriptor = EndpointDescriptor::new("https://api.example.com", "items");
//! let endpoint: Endpoint<EndpointDescriptor, serde_json::Value> =
//!     Endpoint::with_descriptor(transport.dispatcher(), descriptor);
//!
//! let response = endpoint.request(Operation::Get).await;
//! assert_result_count(&response, 2);
//! assert_eq!(transport.call_count(), 1);
//! # });
//! ```

mod assertions;
mod mock;

pub use assertions::*;
pub use mock::*;

pub use polymer_core::{TransportRequest, TransportResponse};
