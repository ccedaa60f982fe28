// Polymer - Typed REST endpoints for Rust
//
// Endpoints pair a descriptor (where and how to call) with a result type
// (what comes back) and complete every call with a single Response.

// Re-export core functionality
pub use polymer_core::*;

// Re-export the transport crate
pub use polymer_http_client;

// Re-export optional crates
#[cfg(feature = "config")]
pub use polymer_config;

#[cfg(feature = "testing")]
pub use polymer_testing;

#[cfg(feature = "config")]
mod settings;

#[cfg(feature = "config")]
pub use settings::{dispatcher_from_settings, http_client_config};
