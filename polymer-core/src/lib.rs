//! # Polymer Core
//!
//! Typed REST endpoints. An endpoint pairs a descriptor (where and how to
//! call) with a result type (what comes back). Every verb dispatches once
//! and completes with a [`Response`]: the list of results (one element for
//! a single object, possibly empty for an empty array) or an error.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use polymer_core::prelude::*;
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Debug, Deserialize)]
//! struct Artist {
//!     name: String,
//! }
//!
//! #[derive(Default)]
//! struct ArtistSearch;
//!
//! impl DescribeEndpoint for ArtistSearch {
//!     fn describe(&self, _operation: Operation) -> Result<EndpointDescriptor> {
//!         Ok(EndpointDescriptor::new("https://api.spotify.com/v1", "search")
//!             .with_response_key_path("artists.items"))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let endpoint: Endpoint<ArtistSearch, Artist> = Endpoint::new(Dispatcher::http()?)
//!         .with_parameters(&json!({"q": "tania bowra", "type": "artist"}));
//!
//!     endpoint
//!         .get(|response| match response {
//!             Response::Result(artists) => {
//!                 for artist in artists {
//!                     println!("{}", artist.name);
//!                 }
//!             }
//!             Response::Error(err) => eprintln!("search failed: {}", err),
//!         })
//!         .await;
//!     Ok(())
//! }
//! ```
//!
//! ## Classification
//!
//! The mapped payload is checked before the error: a sequence of results
//! wins, then a single result, then the error. A response that is neither
//! becomes [`PolymerError::UnknownResponse`].

pub mod classifier;
pub mod codec;
pub mod descriptor;
pub mod dispatcher;
pub mod endpoint;
pub mod error;
pub mod mapper;
pub mod operation;
pub mod query;
pub mod response;
pub mod slug;
pub mod transport;

pub use classifier::classify;
pub use codec::{
    FormCodec, JsonCodec, RequestCodec, ResponseCodec, SharedRequestCodec, SharedResponseCodec,
    TextCodec,
};
pub use descriptor::{
    DescribeEndpoint, EndpointDescriptor, ResponseTransformer, SlugValidityCheck,
    SlugValueForPath,
};
pub use dispatcher::{CallSpec, Dispatchable, Dispatcher, ErasedCall, RawOutcome};
pub use endpoint::Endpoint;
pub use error::{PolymerError, Result};
pub use mapper::{
    HEADER_FIELD, KeyPathMapper, MapOutcome, Mapped, Mapper, ResultShape, append_header,
    value_at_key_path,
};
pub use operation::Operation;
pub use response::Response;
pub use transport::{Transport, TransportRequest, TransportResponse};

pub use polymer_http_client::{HttpClient, HttpClientConfig};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        DescribeEndpoint, Dispatcher, Endpoint, EndpointDescriptor, Operation, PolymerError,
        Response, Result,
    };
}
