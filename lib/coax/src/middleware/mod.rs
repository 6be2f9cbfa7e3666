//! Tower middleware layers for the session transport.
//!
//! Layers wrap the type-erased [`BoxedTransport`](crate::BoxedTransport):
//! they see every outgoing `http::Request<Bytes>` and the buffered
//! `http::Response<Bytes>` before it is decoded. The first layer added is the
//! outermost.
//!
//! # Available Layers
//!
//! - [`LoggingLayer`] - Logs exchanges using `tracing`
//!
//! Any tower layer with matching request, response and error types can be
//! added with [`SessionBuilder::layer`](crate::SessionBuilder::layer).

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};
