//! Core types for coax response decoding.
//!
//! This crate turns raw response bodies into typed results:
//! - [`Envelope`] - the `{code, message, data}` wrapper every response carries
//! - [`transform`] - lenient field transforms between JSON and typed values
//! - [`normalize`] - reshaping payloads into one model, a list, or a keyed map
//! - [`Outcome`] and [`Effect`] - request result states
//! - [`Error`] and [`classify`] - the failure taxonomy
//! - [`Decoder`] - the entry point bundling all of the above
//!
//! Everything here is synchronous and free of I/O; the `coax` crate adds the
//! HTTP session on top.

mod charset;
pub mod classify;
mod config;
mod decode;
mod envelope;
mod error;
pub mod model;
pub mod normalize;
mod outcome;
pub mod prelude;
pub mod transform;

pub use charset::{charset_of, to_utf8};
pub use classify::classify;
pub use config::{ResponseKeys, UrlConfig, UrlConfigBuilder};
pub use decode::{Decoder, TransportResult};
pub use envelope::Envelope;
pub use error::{Error, Result};
pub use model::{Model, serde_model};
pub use normalize::{ModelShape, Shaped};
pub use outcome::{Effect, Outcome};

// Re-export crates for macro-generated code
#[doc(hidden)]
pub use serde_json;
pub use url;
