//! HTTP transport using hyper-util.

use std::error::Error as _;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use bytes::Bytes;
use coax_core::TransportResult;
use coax_core::classify::codes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;
use tower::util::BoxCloneService;
use tower_service::Service;
use tracing::debug;

use crate::config::SessionConfig;
use crate::connector::https_connector;
use crate::error::TransportError;

/// Type-erased transport service, the unit middleware layers wrap.
pub type BoxedTransport =
    BoxCloneService<http::Request<Bytes>, http::Response<Bytes>, TransportError>;

/// Future returned by transport services.
pub type TransportFuture = Pin<
    Box<dyn Future<Output = Result<http::Response<Bytes>, TransportError>> + Send + 'static>,
>;

/// Shares a [`BoxedTransport`] between clones of a session.
#[derive(Clone)]
pub(crate) struct SharedTransport {
    inner: Arc<Mutex<BoxedTransport>>,
}

impl SharedTransport {
    pub(crate) fn new(service: BoxedTransport) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    pub(crate) fn call(&self, request: http::Request<Bytes>) -> TransportFuture {
        let mut service = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();

        Box::pin(async move { service.call(request).await })
    }
}

/// Transport over a pooled hyper client.
#[derive(Clone)]
pub(crate) struct HyperTransport {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    config: SessionConfig,
}

impl HyperTransport {
    pub(crate) fn new(config: SessionConfig) -> Self {
        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(https_connector(config.connect_timeout));

        Self { inner, config }
    }

    async fn execute(
        &self,
        request: http::Request<Bytes>,
    ) -> Result<http::Response<Bytes>, TransportError> {
        let request = request.map(Full::new);

        let exchange = async {
            let response = self.inner.request(request).await.map_err(map_hyper_error)?;
            let (parts, body) = response.into_parts();
            let body = body
                .collect()
                .await
                .map_err(|e| TransportError::body(e.to_string()))?
                .to_bytes();
            Ok::<_, TransportError>(http::Response::from_parts(parts, body))
        };

        tokio::time::timeout(self.config.timeout, exchange)
            .await
            .map_err(|_| TransportError::Timeout)?
    }
}

#[allow(clippy::needless_pass_by_value)]
fn map_hyper_error(err: hyper_util::client::legacy::Error) -> TransportError {
    let message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<io::Error>() {
            match io.kind() {
                io::ErrorKind::TimedOut => return TransportError::Timeout,
                io::ErrorKind::NetworkUnreachable | io::ErrorKind::NetworkDown => {
                    return TransportError::connect(io.to_string(), true);
                }
                _ => {}
            }
        }
        source = cause.source();
    }

    TransportError::connect(message, false)
}

impl Service<http::Request<Bytes>> for HyperTransport {
    type Response = http::Response<Bytes>;
    type Error = TransportError;
    type Future = TransportFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), TransportError>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: http::Request<Bytes>) -> Self::Future {
        let transport = self.clone();
        Box::pin(async move { transport.execute(request).await })
    }
}

/// Turn an HTTP exchange into what the decoder consumes.
///
/// Non-2xx statuses are transport failures; the `Content-Type` charset is the
/// declared encoding.
pub(crate) fn into_transport_result(
    result: Result<http::Response<Bytes>, TransportError>,
) -> TransportResult {
    match result {
        Ok(response) if response.status().is_success() => {
            let encoding = response
                .headers()
                .get(http::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .and_then(coax_core::charset_of)
                .map(str::to_string);
            TransportResult::Delivered {
                body: response.into_body(),
                encoding,
            }
        }
        Ok(response) => {
            debug!(status = response.status().as_u16(), "unacceptable HTTP status");
            TransportResult::failed(codes::BAD_SERVER_RESPONSE)
        }
        Err(err) => TransportResult::failed(err.code()),
    }
}
