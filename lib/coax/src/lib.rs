//! HTTP session for JSON APIs that wrap every response in an envelope.
//!
//! Responses look like `{"code": 0, "message": null, "data": ...}`. A
//! [`Session`] sends requests, checks the envelope and turns the payload into
//! typed models, reporting every failure through one flat [`Error`] type.
//!
//! # Example
//!
//! ```ignore
//! use coax::prelude::*;
//!
//! #[derive(Debug, Model)]
//! #[model(rename_all = "camelCase")]
//! pub struct Post {
//!     id: i64,
//!     title: Option<String>,
//!     #[model(with = PictureList)]
//!     images: Vec<Url>,
//! }
//!
//! let config = UrlConfig::builder(Url::parse("https://api.example.com/")?)
//!     .base_picture_url("https://img.example.com/")
//!     .build();
//! let session = Session::builder(config).with_logging().build();
//!
//! match session.get("posts", &[("page", 1)]).list::<Post>().await {
//!     Outcome::Succeeded(posts) => println!("{} posts", posts.len()),
//!     Outcome::Failed(err) => eprintln!("{err}"),
//!     Outcome::Pending => unreachable!(),
//! }
//! ```

mod config;
mod connector;
mod error;
pub mod middleware;
pub mod prelude;
mod session;
mod transport;

pub use config::{SessionConfig, SessionConfigBuilder};
pub use error::TransportError;
pub use session::{Call, HeaderProvider, Session, SessionBuilder};
pub use transport::{BoxedTransport, TransportFuture};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use coax_core::{
    Decoder, Effect, Envelope, Error, Model, ModelShape, Outcome, ResponseKeys, Result, Shaped,
    TransportResult, UrlConfig, UrlConfigBuilder, charset_of, classify, model, normalize,
    serde_model, to_utf8, transform,
};

// Re-export crates for macro-generated code
#[doc(hidden)]
pub use serde_json;
pub use url;

// Re-export macros
pub use coax_macro::Model;
