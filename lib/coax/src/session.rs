//! HTTP session issuing requests and decoding their responses.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use coax_core::{Decoder, Effect, Model, Outcome, TransportResult, UrlConfig};
use http::header::{self, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use tower::Layer;
use tower::util::BoxCloneService;
use tower_service::Service;
use tracing::warn;

use crate::config::{SessionConfig, SessionConfigBuilder};
use crate::error::TransportError;
use crate::middleware::LoggingLayer;
use crate::transport::{BoxedTransport, HyperTransport, SharedTransport, into_transport_result};

/// Supplies extra headers for each request; `None` values are skipped.
pub type HeaderProvider = Arc<dyn Fn() -> Vec<(String, Option<String>)> + Send + Sync>;

type LayerFn = Arc<dyn Fn(BoxedTransport) -> BoxedTransport + Send + Sync>;

/// HTTP session bound to a [`UrlConfig`].
///
/// Every request carries the version header and the headers of the optional
/// [`HeaderProvider`]. Each call returns its own [`Call`], which resolves to an
/// [`Outcome`] once awaited.
///
/// # Example
///
/// ```ignore
/// use coax::prelude::*;
///
/// let config = UrlConfig::builder(Url::parse("https://api.example.com/")?).build();
/// let session = Session::new(config);
///
/// let posts: Outcome<Vec<Post>> = session.get("posts", &[("page", 1)]).list().await;
/// ```
#[derive(Clone)]
pub struct Session {
    decoder: Decoder,
    transport: SharedTransport,
    headers: Option<HeaderProvider>,
    config: SessionConfig,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("url_config", self.decoder.config())
            .field("config", &self.config)
            .field("has_header_provider", &self.headers.is_some())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session with default transport settings.
    #[must_use]
    pub fn new(config: UrlConfig) -> Self {
        Self::builder(config).build()
    }

    /// Create a session builder.
    #[must_use]
    pub fn builder(config: UrlConfig) -> SessionBuilder {
        SessionBuilder::new(config)
    }

    /// The URL configuration.
    #[must_use]
    pub fn url_config(&self) -> &UrlConfig {
        self.decoder.config()
    }

    /// The transport settings.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The decoder used for responses.
    #[must_use]
    pub const fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// Prepare a GET request; `params` are query-encoded.
    pub fn get<P: Serialize + ?Sized>(&self, path: &str, params: &P) -> Call {
        let request = serde_html_form::to_string(params)
            .map_err(|e| TransportError::invalid_request(e.to_string()))
            .and_then(|query| self.prepare(http::Method::GET, path, Some(&query), None));
        self.call(request)
    }

    /// Prepare a POST request; `params` are form-encoded.
    pub fn post<P: Serialize + ?Sized>(&self, path: &str, params: &P) -> Call {
        let request = serde_html_form::to_string(params)
            .map_err(|e| TransportError::invalid_request(e.to_string()))
            .and_then(|form| {
                let body = (
                    HeaderValue::from_static("application/x-www-form-urlencoded"),
                    Bytes::from(form),
                );
                self.prepare(http::Method::POST, path, None, Some(body))
            });
        self.call(request)
    }

    /// Prepare a POST request with a JSON body.
    pub fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Call {
        let request = serde_json::to_vec(body)
            .map_err(|e| TransportError::invalid_request(e.to_string()))
            .and_then(|json| {
                let body = (
                    HeaderValue::from_static("application/json"),
                    Bytes::from(json),
                );
                self.prepare(http::Method::POST, path, None, Some(body))
            });
        self.call(request)
    }

    fn call(&self, request: Result<http::Request<Bytes>, TransportError>) -> Call {
        Call {
            session: self.clone(),
            request,
        }
    }

    fn prepare(
        &self,
        method: http::Method,
        path: &str,
        query: Option<&str>,
        body: Option<(HeaderValue, Bytes)>,
    ) -> Result<http::Request<Bytes>, TransportError> {
        let config = self.decoder.config();
        let mut url = config
            .base_url
            .join(path)
            .map_err(|e| TransportError::invalid_request(format!("invalid path {path:?}: {e}")))?;
        if let Some(query) = query.filter(|query| !query.is_empty()) {
            let merged = match url.query() {
                Some(existing) if !existing.is_empty() => format!("{existing}&{query}"),
                _ => query.to_string(),
            };
            url.set_query(Some(&merged));
        }

        let mut builder = http::Request::builder()
            .method(method)
            .uri(url.as_str())
            .header(config.version_header_key.as_str(), config.version.as_str());

        if let Some(provider) = &self.headers {
            for (name, value) in provider() {
                if let Some(value) = value {
                    builder = builder.header(name, value);
                }
            }
        }

        let body = match body {
            Some((content_type, bytes)) => {
                builder = builder.header(header::CONTENT_TYPE, content_type);
                bytes
            }
            None => Bytes::new(),
        };

        builder
            .body(body)
            .map_err(|e| TransportError::invalid_request(e.to_string()))
    }
}

/// One prepared request.
///
/// Nothing is sent until one of the consuming methods is awaited; dropping the
/// future cancels the request.
#[derive(Debug)]
#[must_use = "a call does nothing unless awaited"]
pub struct Call {
    session: Session,
    request: Result<http::Request<Bytes>, TransportError>,
}

impl Call {
    /// Add a header to this request only.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.request = self.request.and_then(|mut request| {
            let name = HeaderName::try_from(name)
                .map_err(|e| TransportError::invalid_request(e.to_string()))?;
            let value = HeaderValue::try_from(value)
                .map_err(|e| TransportError::invalid_request(e.to_string()))?;
            request.headers_mut().insert(name, value);
            Ok(request)
        });
        self
    }

    /// Send the request and return what the transport delivered.
    pub async fn send(self) -> TransportResult {
        let request = match self.request {
            Ok(request) => request,
            Err(err) => {
                warn!(error = %err, "request not sent");
                return TransportResult::failed(err.code());
            }
        };
        into_transport_result(self.session.transport.call(request).await)
    }

    async fn exchange(self) -> (Decoder, TransportResult) {
        let decoder = self.session.decoder.clone();
        (decoder, self.send().await)
    }

    /// Decode one [`Model`].
    pub async fn single<M: Model>(self) -> Outcome<M> {
        let (decoder, result) = self.exchange().await;
        decoder.resolve_single(&result, |json| M::from_json(json, decoder.config()))
    }

    /// Decode a list of [`Model`]s.
    pub async fn list<M: Model>(self) -> Outcome<Vec<M>> {
        let (decoder, result) = self.exchange().await;
        decoder.resolve_list(&result, |json| M::from_json(json, decoder.config()))
    }

    /// Decode [`Model`]s grouped by key.
    pub async fn keyed_map<M: Model>(self) -> Outcome<BTreeMap<String, Vec<M>>> {
        let (decoder, result) = self.exchange().await;
        decoder.resolve_keyed_map(&result, |json| M::from_json(json, decoder.config()))
    }

    /// Decode one value with a custom constructor.
    pub async fn single_with<T, F>(self, construct: F) -> Outcome<T>
    where
        F: Fn(&Value) -> Option<T>,
    {
        let (decoder, result) = self.exchange().await;
        decoder.resolve_single(&result, construct)
    }

    /// Decode a list with a custom constructor.
    pub async fn list_with<T, F>(self, construct: F) -> Outcome<Vec<T>>
    where
        F: Fn(&Value) -> Option<T>,
    {
        let (decoder, result) = self.exchange().await;
        decoder.resolve_list(&result, construct)
    }

    /// Decode a keyed map with a custom constructor.
    pub async fn keyed_map_with<T, F>(self, construct: F) -> Outcome<BTreeMap<String, Vec<T>>>
    where
        F: Fn(&Value) -> Option<T>,
    {
        let (decoder, result) = self.exchange().await;
        decoder.resolve_keyed_map(&result, construct)
    }

    /// Check the envelope and ignore the payload.
    pub async fn effect(self) -> Effect {
        let (decoder, result) = self.exchange().await;
        decoder.resolve_effect(&result)
    }

    /// Decode the body as plain JSON, without envelope semantics.
    pub async fn json(self) -> Outcome<Value> {
        let (decoder, result) = self.exchange().await;
        decoder.resolve_json(&result)
    }

    /// Decode the body as text.
    pub async fn text(self) -> Outcome<String> {
        let (decoder, result) = self.exchange().await;
        decoder.resolve_text(&result)
    }
}

/// Builder for [`Session`].
///
/// # Example
///
/// ```ignore
/// use coax::Session;
/// use std::time::Duration;
///
/// let session = Session::builder(config)
///     .timeout(Duration::from_secs(15))
///     .header_provider(|| vec![("token".to_string(), current_token())])
///     .with_logging()
///     .build();
/// ```
pub struct SessionBuilder {
    url_config: UrlConfig,
    config: SessionConfigBuilder,
    layers: Vec<LayerFn>,
    headers: Option<HeaderProvider>,
}

impl std::fmt::Debug for SessionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBuilder")
            .field("url_config", &self.url_config)
            .field("config", &self.config)
            .field("layers_count", &self.layers.len())
            .field("has_header_provider", &self.headers.is_some())
            .finish()
    }
}

impl SessionBuilder {
    /// Create a builder for the given URL configuration.
    #[must_use]
    pub fn new(url_config: UrlConfig) -> Self {
        Self {
            url_config,
            config: SessionConfigBuilder::default(),
            layers: Vec::new(),
            headers: None,
        }
    }

    /// Set the whole-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.timeout(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.connect_timeout(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.config = self.config.pool_idle_per_host(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.pool_idle_timeout(timeout);
        self
    }

    /// Set a provider of extra headers, called for every request.
    #[must_use]
    pub fn header_provider(
        mut self,
        provider: impl Fn() -> Vec<(String, Option<String>)> + Send + Sync + 'static,
    ) -> Self {
        self.headers = Some(Arc::new(provider));
        self
    }

    /// Add a Tower layer around the transport.
    ///
    /// Layers are applied in order: first added = outermost.
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<BoxedTransport> + Send + Sync + 'static,
        L::Service: Service<
                http::Request<Bytes>,
                Response = http::Response<Bytes>,
                Error = TransportError,
            > + Clone
            + Send
            + 'static,
        <L::Service as Service<http::Request<Bytes>>>::Future: Send,
    {
        self.layers
            .push(Arc::new(move |service| BoxCloneService::new(layer.layer(service))));
        self
    }

    /// Log every exchange at info level.
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.layer(LoggingLayer::new())
    }

    /// Log every exchange at debug level, with headers and body sizes.
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.layer(LoggingLayer::debug())
    }

    /// Build the session.
    #[must_use]
    pub fn build(self) -> Session {
        let config = self.config.build();

        let mut service: BoxedTransport = BoxCloneService::new(HyperTransport::new(config.clone()));
        for layer_fn in self.layers.iter().rev() {
            service = layer_fn(service);
        }

        Session {
            decoder: Decoder::new(self.url_config),
            transport: SharedTransport::new(service),
            headers: self.headers,
            config,
        }
    }
}
