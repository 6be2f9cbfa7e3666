//! Response envelope decoding.
//!
//! Every response body is an object carrying a status code, an optional
//! message and an optional payload, under keys named by [`ResponseKeys`]:
//!
//! ```json
//! {"code": 0, "message": null, "data": {"id": 1}}
//! ```

use serde_json::Value;
use tracing::debug;

use crate::transform::coerce;
use crate::{Error, ResponseKeys, Result, charset};

/// A decoded response envelope.
///
/// Construction guarantees that `code` was present and that a non-zero code
/// comes with a message.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    code: i64,
    message: Option<String>,
    payload: Option<Value>,
}

impl Envelope {
    /// Decode raw response bytes in the declared charset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if the bytes cannot be transcoded, are
    /// not a JSON object, or do not form a valid envelope.
    ///
    /// ```
    /// use coax_core::{Envelope, ResponseKeys};
    ///
    /// let body = br#"{"code":"0","data":[1,2]}"#;
    /// let keys = ResponseKeys::default();
    /// let envelope = Envelope::decode(body, None, &keys).expect("valid envelope");
    /// assert!(envelope.is_success());
    /// ```
    pub fn decode(bytes: &[u8], encoding: Option<&str>, keys: &ResponseKeys) -> Result<Self> {
        let bytes = charset::to_utf8(bytes, encoding)?;
        let json: Value = serde_json::from_slice(&bytes).map_err(|err| {
            debug!(error = %err, "response is not JSON");
            Error::Serialization
        })?;
        Self::from_json(json, keys)
    }

    /// Build an envelope from an already parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if the value is not an object, has no
    /// usable code, or has a non-zero code without a message.
    pub fn from_json(json: Value, keys: &ResponseKeys) -> Result<Self> {
        let Value::Object(mut object) = json else {
            debug!("response is not a JSON object");
            return Err(Error::Serialization);
        };

        let Some(code) = coerce::<i64>(object.get(&keys.code)) else {
            debug!(key = %keys.code, "response has no status code");
            return Err(Error::Serialization);
        };

        let message = match object.remove(&keys.message) {
            Some(Value::String(message)) => Some(message),
            _ => None,
        };
        if code != 0 && message.is_none() {
            debug!(code, "business error without message");
            return Err(Error::Serialization);
        }

        let payload = object.remove(&keys.data).filter(|value| !value.is_null());

        Ok(Self {
            code,
            message,
            payload,
        })
    }

    /// Server status code.
    #[must_use]
    pub const fn code(&self) -> i64 {
        self.code
    }

    /// Server message.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Payload, if any.
    #[must_use]
    pub const fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// The code is `0`.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Fail with [`Error::Business`] unless the code is `0`.
    ///
    /// # Errors
    ///
    /// Returns the business error declared by the server.
    pub fn check(&self) -> Result<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(Error::business(
                self.code,
                self.message.clone().unwrap_or_default(),
            ))
        }
    }

    /// Consume into the payload, failing with the business error if any.
    ///
    /// # Errors
    ///
    /// Returns the business error declared by the server.
    pub fn into_payload(self) -> Result<Option<Value>> {
        self.check()?;
        Ok(self.payload)
    }

    /// Consume into (code, message, payload).
    #[must_use]
    pub fn into_parts(self) -> (i64, Option<String>, Option<Value>) {
        (self.code, self.message, self.payload)
    }
}
