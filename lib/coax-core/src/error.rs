//! Error taxonomy for response decoding.

use derive_more::{Display, Error};
use serde_json::Value;

/// Every way a request can fail once it reaches this layer.
///
/// The taxonomy is flat: transport failures, unparsable responses, server-declared
/// business errors and payloads the model constructor rejected.
///
/// ```
/// use coax_core::Error;
///
/// let err = Error::business(4, "not found");
/// assert_eq!(err.to_string(), "not found");
/// assert!(err.is_recoverable());
/// ```
#[derive(Debug, Clone, PartialEq, Display, Error)]
pub enum Error {
    /// The request never produced a usable response (timeout, no network, HTTP failure).
    #[display("{_0}")]
    Transport(#[error(not(source))] String),

    /// The response body is not a well-formed envelope.
    #[display("invalid response data")]
    Serialization,

    /// The server answered with a non-zero status code.
    #[display("{message}")]
    Business {
        /// Status code declared by the server.
        code: i64,
        /// Message declared by the server.
        message: String,
    },

    /// The payload could not be turned into the requested model.
    #[display("invalid data returned")]
    InvalidPayload(#[error(not(source))] Option<Value>),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a transport error from a human-readable message.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Create a business error.
    #[must_use]
    pub fn business(code: i64, message: impl Into<String>) -> Self {
        Self::Business {
            code,
            message: message.into(),
        }
    }

    /// Create an invalid payload error carrying the offending payload.
    #[must_use]
    pub const fn invalid_payload(payload: Option<Value>) -> Self {
        Self::InvalidPayload(payload)
    }

    /// Returns `true` if this is a transport error.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if this is a serialization error.
    #[must_use]
    pub const fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization)
    }

    /// Returns `true` if this is a business error.
    #[must_use]
    pub const fn is_business(&self) -> bool {
        matches!(self, Self::Business { .. })
    }

    /// Returns `true` if this is an invalid payload error.
    #[must_use]
    pub const fn is_invalid_payload(&self) -> bool {
        matches!(self, Self::InvalidPayload(_))
    }

    /// Returns `true` if the caller may reasonably retry or surface the message.
    ///
    /// Serialization and invalid payload errors mean client and server disagree
    /// on the contract; retrying will not help.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Business { .. })
    }

    /// Returns the server status code if this is a business error.
    #[must_use]
    pub const fn code(&self) -> Option<i64> {
        match self {
            Self::Business { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns the rejected payload if this is an invalid payload error.
    #[must_use]
    pub const fn payload(&self) -> Option<&Value> {
        match self {
            Self::InvalidPayload(payload) => payload.as_ref(),
            _ => None,
        }
    }
}
