//! Response decoding entry points.

use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, warn};

use crate::normalize::{self, ModelShape, Shaped};
use crate::{Effect, Envelope, Error, Model, Outcome, Result, UrlConfig, charset, classify};

/// What the transport delivered for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportResult {
    /// A response body and its declared charset.
    Delivered {
        /// Raw body bytes.
        body: Bytes,
        /// Charset label from the response, if any.
        encoding: Option<String>,
    },
    /// The request failed before a usable body arrived.
    Failed {
        /// Transport failure code, see [`crate::classify::codes`].
        code: i64,
    },
}

impl TransportResult {
    /// A delivered body.
    #[must_use]
    pub fn delivered(body: impl Into<Bytes>, encoding: Option<&str>) -> Self {
        Self::Delivered {
            body: body.into(),
            encoding: encoding.map(str::to_string),
        }
    }

    /// A transport failure.
    #[must_use]
    pub const fn failed(code: i64) -> Self {
        Self::Failed { code }
    }
}

/// Decodes response bodies into [`Outcome`]s.
///
/// Holds the shared configuration; cheap to clone.
///
/// ```
/// use coax_core::{Decoder, UrlConfig};
/// use coax_core::url::Url;
/// use serde_json::Value;
///
/// let config = UrlConfig::builder(Url::parse("https://api.test/").expect("valid url")).build();
/// let decoder = Decoder::new(config);
///
/// let body = br#"{"code":0,"data":[{"id":1},{"bad":true}]}"#;
/// let outcome = decoder.decode_list(body, None, |json: &Value| {
///     json.get("id").and_then(Value::as_i64)
/// });
/// assert_eq!(outcome.into_value(), Some(vec![1]));
/// ```
#[derive(Debug, Clone)]
pub struct Decoder {
    config: Arc<UrlConfig>,
}

impl Decoder {
    /// Create a decoder.
    #[must_use]
    pub fn new(config: UrlConfig) -> Self {
        Self::shared(Arc::new(config))
    }

    /// Create a decoder from an already shared configuration.
    #[must_use]
    pub const fn shared(config: Arc<UrlConfig>) -> Self {
        Self { config }
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &UrlConfig {
        &self.config
    }

    fn envelope(&self, bytes: &[u8], encoding: Option<&str>) -> Result<Envelope> {
        Envelope::decode(bytes, encoding, &self.config.response_keys)
    }

    /// Decode a body into any shape.
    pub fn decode<T, F>(
        &self,
        bytes: &[u8],
        encoding: Option<&str>,
        shape: ModelShape,
        construct: F,
    ) -> Outcome<Shaped<T>>
    where
        F: Fn(&Value) -> Option<T>,
    {
        let result = self
            .envelope(bytes, encoding)
            .and_then(|envelope| normalize::normalize(envelope, shape, construct));
        resolved(result)
    }

    /// Decode a body holding one model.
    pub fn decode_single<T, F>(
        &self,
        bytes: &[u8],
        encoding: Option<&str>,
        construct: F,
    ) -> Outcome<T>
    where
        F: Fn(&Value) -> Option<T>,
    {
        let result = self
            .envelope(bytes, encoding)
            .and_then(Envelope::into_payload)
            .and_then(|payload| normalize::single(payload, construct));
        resolved(result)
    }

    /// Decode a body holding a list of models.
    pub fn decode_list<T, F>(
        &self,
        bytes: &[u8],
        encoding: Option<&str>,
        construct: F,
    ) -> Outcome<Vec<T>>
    where
        F: Fn(&Value) -> Option<T>,
    {
        let result = self
            .envelope(bytes, encoding)
            .and_then(Envelope::into_payload)
            .map(|payload| normalize::list(payload, construct));
        resolved(result)
    }

    /// Decode a body holding models grouped by key.
    pub fn decode_keyed_map<T, F>(
        &self,
        bytes: &[u8],
        encoding: Option<&str>,
        construct: F,
    ) -> Outcome<BTreeMap<String, Vec<T>>>
    where
        F: Fn(&Value) -> Option<T>,
    {
        let result = self
            .envelope(bytes, encoding)
            .and_then(Envelope::into_payload)
            .and_then(|payload| normalize::keyed_map(payload, construct));
        resolved(result)
    }

    /// Decode a body whose payload is ignored.
    pub fn decode_effect(&self, bytes: &[u8], encoding: Option<&str>) -> Effect {
        let result = self
            .envelope(bytes, encoding)
            .and_then(|envelope| envelope.check());
        resolved::<()>(result).effect()
    }

    /// Decode a body as plain JSON, without envelope semantics.
    pub fn decode_json(&self, bytes: &[u8], encoding: Option<&str>) -> Outcome<Value> {
        let result = charset::to_utf8(bytes, encoding).and_then(|bytes| {
            serde_json::from_slice(&bytes).map_err(|err| {
                debug!(error = %err, "response is not JSON");
                Error::Serialization
            })
        });
        resolved(result)
    }

    /// Decode a body as text.
    pub fn decode_text(&self, bytes: &[u8], encoding: Option<&str>) -> Outcome<String> {
        let result = charset::to_utf8(bytes, encoding).and_then(|bytes| {
            String::from_utf8(bytes.into_owned()).map_err(|err| {
                debug!(error = %err, "response is not UTF-8 text");
                Error::Serialization
            })
        });
        resolved(result)
    }

    /// Decode one [`Model`].
    pub fn single<M: Model>(&self, bytes: &[u8], encoding: Option<&str>) -> Outcome<M> {
        self.decode_single(bytes, encoding, |json| M::from_json(json, &self.config))
    }

    /// Decode a list of [`Model`]s.
    pub fn list<M: Model>(&self, bytes: &[u8], encoding: Option<&str>) -> Outcome<Vec<M>> {
        self.decode_list(bytes, encoding, |json| M::from_json(json, &self.config))
    }

    /// Decode [`Model`]s grouped by key.
    pub fn keyed_map<M: Model>(
        &self,
        bytes: &[u8],
        encoding: Option<&str>,
    ) -> Outcome<BTreeMap<String, Vec<M>>> {
        self.decode_keyed_map(bytes, encoding, |json| M::from_json(json, &self.config))
    }

    /// Resolve a transport result holding one model.
    pub fn resolve_single<T, F>(&self, result: &TransportResult, construct: F) -> Outcome<T>
    where
        F: Fn(&Value) -> Option<T>,
    {
        match delivered(result) {
            Ok((body, encoding)) => self.decode_single(body, encoding, construct),
            Err(err) => Outcome::Failed(err),
        }
    }

    /// Resolve a transport result holding a list of models.
    pub fn resolve_list<T, F>(&self, result: &TransportResult, construct: F) -> Outcome<Vec<T>>
    where
        F: Fn(&Value) -> Option<T>,
    {
        match delivered(result) {
            Ok((body, encoding)) => self.decode_list(body, encoding, construct),
            Err(err) => Outcome::Failed(err),
        }
    }

    /// Resolve a transport result holding models grouped by key.
    pub fn resolve_keyed_map<T, F>(
        &self,
        result: &TransportResult,
        construct: F,
    ) -> Outcome<BTreeMap<String, Vec<T>>>
    where
        F: Fn(&Value) -> Option<T>,
    {
        match delivered(result) {
            Ok((body, encoding)) => self.decode_keyed_map(body, encoding, construct),
            Err(err) => Outcome::Failed(err),
        }
    }

    /// Resolve a transport result whose payload is ignored.
    pub fn resolve_effect(&self, result: &TransportResult) -> Effect {
        match delivered(result) {
            Ok((body, encoding)) => self.decode_effect(body, encoding),
            Err(err) => Effect::Failed(err),
        }
    }

    /// Resolve a transport result as plain JSON.
    pub fn resolve_json(&self, result: &TransportResult) -> Outcome<Value> {
        match delivered(result) {
            Ok((body, encoding)) => self.decode_json(body, encoding),
            Err(err) => Outcome::Failed(err),
        }
    }

    /// Resolve a transport result as text.
    pub fn resolve_text(&self, result: &TransportResult) -> Outcome<String> {
        match delivered(result) {
            Ok((body, encoding)) => self.decode_text(body, encoding),
            Err(err) => Outcome::Failed(err),
        }
    }
}

fn delivered(result: &TransportResult) -> Result<(&[u8], Option<&str>)> {
    match result {
        TransportResult::Delivered { body, encoding } => Ok((body.as_ref(), encoding.as_deref())),
        TransportResult::Failed { code } => {
            let err = classify(*code);
            debug!(code, error = %err, "transport failure");
            Err(err)
        }
    }
}

fn resolved<T>(result: Result<T>) -> Outcome<T> {
    if let Err(err) = &result {
        match err {
            Error::Serialization | Error::InvalidPayload(_) => {
                warn!(error = %err, "response does not match the expected contract");
            }
            Error::Business { code, message } => {
                debug!(code, reason = %message, "business error");
            }
            Error::Transport(_) => {}
        }
    }
    result.into()
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use serde_json::json;
    use url::Url;

    use super::*;
    use crate::classify::codes;

    fn decoder() -> Decoder {
        let base = Url::parse("https://api.test/").expect("valid url");
        Decoder::new(UrlConfig::builder(base).build())
    }

    fn id(json: &Value) -> Option<i64> {
        json.get("id").and_then(Value::as_i64)
    }

    #[test]
    fn single_success() {
        let body = br#"{"code":0,"message":null,"data":{"id":1}}"#;
        check!(decoder().decode_single(body, None, id) == Outcome::Succeeded(1));
    }

    #[test]
    fn single_invalid_payload_keeps_payload() {
        let body = br#"{"code":0,"data":"oops"}"#;
        let_assert!(Outcome::Failed(err) = decoder().decode_single(body, None, id));
        check!(err == Error::invalid_payload(Some(json!("oops"))));
    }

    #[test]
    fn business_error_every_shape() {
        let body = br#"{"code":4,"message":"not found"}"#;
        let expected = Error::business(4, "not found");
        let decoder = decoder();

        check!(decoder.decode_single(body, None, id).error() == Some(&expected));
        check!(decoder.decode_list(body, None, id).error() == Some(&expected));
        check!(decoder.decode_keyed_map(body, None, id).error() == Some(&expected));
        check!(decoder.decode_effect(body, None).error() == Some(&expected));
    }

    #[test]
    fn list_drops_bad_elements() {
        let body = br#"{"code":0,"data":[{"id":1},{"bad":true}]}"#;
        check!(decoder().decode_list(body, None, id) == Outcome::Succeeded(vec![1]));
    }

    #[test]
    fn keyed_map_success() {
        let body = br#"{"code":0,"data":{"a":[{"id":1}],"b":{"id":2}}}"#;
        let_assert!(Outcome::Succeeded(map) = decoder().decode_keyed_map(body, None, id));
        check!(map.get("a") == Some(&vec![1]));
        check!(map.get("b") == Some(&vec![2]));
    }

    #[test]
    fn not_json_is_serialization() {
        let decoder = decoder();
        check!(
            decoder.decode_single(b"not json", None, id) == Outcome::Failed(Error::Serialization)
        );
        check!(decoder.decode_effect(b"not json", None) == Effect::Failed(Error::Serialization));
    }

    #[test]
    fn effect_ignores_payload() {
        check!(decoder().decode_effect(br#"{"code":0,"data":42}"#, None) == Effect::Succeeded);
    }

    #[test]
    fn shaped_decode() {
        let body = br#"{"code":0,"data":[{"id":7}]}"#;
        let outcome = decoder().decode(body, None, ModelShape::Single, id);
        let_assert!(Outcome::Succeeded(shaped) = outcome);
        check!(shaped == Shaped::Single(7));
    }

    #[test]
    fn json_and_text() {
        let decoder = decoder();
        check!(decoder.decode_json(br#"[1,2]"#, None) == Outcome::Succeeded(json!([1, 2])));
        check!(decoder.decode_json(b"{", None).is_failed());
        check!(
            decoder.decode_text(&[0xD6, 0xD0], Some("gbk")) == Outcome::Succeeded("中".to_string())
        );
        check!(decoder.decode_text(&[0xFF], None) == Outcome::Failed(Error::Serialization));
    }

    #[test]
    fn model_convenience() {
        let body = br#"{"code":0,"data":[{"id":1},{"id":2}]}"#;
        let outcome: Outcome<Vec<Value>> = decoder().list(body, None);
        check!(outcome.map_each(|json| id(&json)) == vec![Some(1), Some(2)]);
    }

    #[test]
    fn transport_failures_are_classified() {
        let decoder = decoder();

        let timed_out = TransportResult::failed(codes::TIMED_OUT);
        let_assert!(Outcome::Failed(err) = decoder.resolve_single(&timed_out, id));
        check!(err == classify(codes::TIMED_OUT));
        check!(err.is_transport());

        let offline = TransportResult::failed(codes::NOT_CONNECTED);
        check!(decoder.resolve_effect(&offline) == Effect::Failed(classify(codes::NOT_CONNECTED)));
        check!(decoder.resolve_list(&offline, id).is_failed());
        check!(decoder.resolve_text(&offline).is_failed());
    }

    #[test]
    fn delivered_results_are_decoded() {
        let decoder = decoder();
        let body = br#"{"code":0,"data":{"id":3}}"#;
        let result = TransportResult::delivered(&body[..], Some("utf-8"));
        check!(decoder.resolve_single(&result, id) == Outcome::Succeeded(3));
        check!(decoder.resolve_keyed_map(&result, id).is_succeeded());
        check!(decoder.resolve_json(&result).is_succeeded());
    }
}
