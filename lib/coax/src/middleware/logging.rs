//! Exchange logging middleware.

use std::task::{Context, Poll};
use std::time::Instant;

use bytes::Bytes;
use tower::{Layer, Service};
use tracing::{Instrument, Level, debug, info, span, warn};

use crate::error::TransportError;
use crate::transport::TransportFuture;

/// Layer that logs every HTTP exchange in an `http_request` span.
///
/// # Example
///
/// ```ignore
/// use coax::Session;
/// use coax::middleware::LoggingLayer;
///
/// let session = Session::builder(config)
///     .layer(LoggingLayer::debug())
///     .build();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

/// Verbosity of the logging middleware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Request headers and response size at debug level.
    Debug,
    /// One line per request and per response.
    #[default]
    Info,
}

impl LoggingLayer {
    /// Create a logging layer at info level.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logging layer at debug level.
    #[must_use]
    pub const fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }

    /// The configured verbosity.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Service that logs HTTP exchanges.
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    level: LogLevel,
}

impl<S> Service<http::Request<Bytes>> for Logging<S>
where
    S: Service<http::Request<Bytes>, Response = http::Response<Bytes>, Error = TransportError>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
{
    type Response = http::Response<Bytes>;
    type Error = TransportError;
    type Future = TransportFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), TransportError>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: http::Request<Bytes>) -> Self::Future {
        let method = request.method().clone();
        let uri = request.uri().clone();
        let level = self.level;

        let span = span!(Level::INFO, "http_request", %method, %uri);

        let mut inner = self.inner.clone();
        Box::pin(
            async move {
                let start = Instant::now();

                if level == LogLevel::Debug {
                    debug!(
                        headers = ?request.headers(),
                        size = request.body().len(),
                        "sending request"
                    );
                } else {
                    info!("sending request");
                }

                let result = inner.call(request).await;
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                match &result {
                    Ok(response) => {
                        let status = response.status().as_u16();
                        if !response.status().is_success() {
                            warn!(status, elapsed_ms, "request failed with HTTP error");
                        } else if level == LogLevel::Debug {
                            debug!(
                                status,
                                elapsed_ms,
                                size = response.body().len(),
                                "request completed"
                            );
                        } else {
                            info!(status, elapsed_ms, "request completed");
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, code = err.code(), elapsed_ms, "request failed");
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}
