//! Transport-level errors.

use derive_more::{Display, Error};

use coax_core::classify::codes;

/// Failures of the HTTP exchange itself, before any body is decoded.
///
/// Each variant maps to a transport failure code through [`TransportError::code`].
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum TransportError {
    /// The request could not be built.
    #[display("invalid request: {_0}")]
    InvalidRequest(#[error(not(source))] String),

    /// The server could not be reached.
    #[display("connection failed: {message}")]
    Connect {
        /// Error details.
        message: String,
        /// The local network is unreachable.
        offline: bool,
    },

    /// The request did not complete in time.
    #[display("request timed out")]
    Timeout,

    /// The response body could not be read.
    #[display("failed to read response body: {_0}")]
    Body(#[error(not(source))] String),
}

impl TransportError {
    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a connection error.
    #[must_use]
    pub fn connect(message: impl Into<String>, offline: bool) -> Self {
        Self::Connect {
            message: message.into(),
            offline,
        }
    }

    /// Create a body error.
    #[must_use]
    pub fn body(message: impl Into<String>) -> Self {
        Self::Body(message.into())
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connect(&self) -> bool {
        matches!(self, Self::Connect { .. })
    }

    /// The transport failure code reported to the decoder.
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::Timeout => codes::TIMED_OUT,
            Self::Connect { offline: true, .. } => codes::NOT_CONNECTED,
            Self::Connect { offline: false, .. } => codes::CANNOT_CONNECT_TO_HOST,
            Self::Body(_) => codes::BAD_SERVER_RESPONSE,
            Self::InvalidRequest(_) => codes::UNKNOWN,
        }
    }
}
