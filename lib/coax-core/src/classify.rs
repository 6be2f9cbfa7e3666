//! Transport failure classification.
//!
//! Transport collaborators report failures as numeric codes; [`classify`] turns
//! them into a [`Error::Transport`] with a message suitable for end users.

use crate::Error;

/// Well-known transport failure codes.
pub mod codes {
    /// Unknown transport failure.
    pub const UNKNOWN: i64 = -1;
    /// The request did not complete in time.
    pub const TIMED_OUT: i64 = -1001;
    /// The host could not be reached.
    pub const CANNOT_CONNECT_TO_HOST: i64 = -1004;
    /// The device has no network connectivity.
    pub const NOT_CONNECTED: i64 = -1009;
    /// The server answered with an unacceptable HTTP status.
    pub const BAD_SERVER_RESPONSE: i64 = -1011;
}

/// Map a transport failure code to a [`Error::Transport`].
///
/// Total: unknown codes fall back to a generic message that embeds the code.
///
/// ```
/// use coax_core::{classify, classify::codes};
///
/// let err = classify(codes::TIMED_OUT);
/// assert!(err.is_transport());
/// assert!(err.to_string().contains("timed out"));
/// ```
#[must_use]
pub fn classify(code: i64) -> Error {
    let message = match code {
        codes::TIMED_OUT => {
            "The request timed out, please check your network connection.".to_string()
        }
        codes::NOT_CONNECTED => {
            "No network connection is available, please check your network connection."
                .to_string()
        }
        other => format!(
            "Server connection error (code {other}), please check your network connection or try again later."
        ),
    };
    Error::Transport(message)
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    #[test]
    fn classify_timeout() {
        insta::assert_snapshot!(
            classify(codes::TIMED_OUT),
            @"The request timed out, please check your network connection."
        );
    }

    #[test]
    fn classify_not_connected() {
        insta::assert_snapshot!(
            classify(codes::NOT_CONNECTED),
            @"No network connection is available, please check your network connection."
        );
    }

    #[test]
    fn classify_fallback_embeds_code() {
        let_assert!(Error::Transport(message) = classify(codes::BAD_SERVER_RESPONSE));
        check!(message.contains("-1011"));

        let_assert!(Error::Transport(message) = classify(42));
        check!(message.contains("42"));
    }
}
