//! Transport error types for partner API calls.
//!
//! These errors describe failures talking to the partner API, not failures
//! reported by it: an upstream `error` payload is a successful transport
//! exchange and is relayed verbatim.
//!
//! - [`HttpError::Network`]: connection or protocol failure
//! - [`HttpError::Timeout`]: the call exceeded the configured timeout
//! - [`HttpError::Decode`]: the response body was not JSON
//! - [`HttpError::InvalidRequest`]: the request failed validation before sending

use serde_json::{json, Value};
use thiserror::Error;

/// Error returned when an [`ApiRequest`](crate::clients::ApiRequest) fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidRequestError {
    /// A POST request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// The API path does not start with `/`.
    #[error("API path '{path}' must start with '/'.")]
    RelativePath {
        /// The offending path.
        path: String,
    },
}

/// Unified error type for partner API transport failures.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    /// The call did not complete within the configured timeout.
    #[error("Request timed out: {0}")]
    Timeout(reqwest::Error),

    /// The response body could not be decoded as JSON.
    #[error("Failed to decode response (status {status}): {message}")]
    Decode {
        /// HTTP status code of the response.
        status: u16,
        /// Decoder error message.
        message: String,
    },

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidRequestError),
}

impl From<reqwest::Error> for HttpError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Network(error)
        }
    }
}

impl HttpError {
    /// Returns a short machine-readable name for the failure.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Timeout(_) => "timeout",
            Self::Decode { .. } => "decode",
            Self::InvalidRequest(_) => "invalid_request",
        }
    }

    /// Returns `true` for [`HttpError::Timeout`].
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Converts the error into the structured value returned to callers
    /// instead of an error.
    ///
    /// ```rust
    /// use shopee_bridge::clients::{HttpError, InvalidRequestError};
    ///
    /// let error = HttpError::from(InvalidRequestError::MissingBody { method: "POST".to_string() });
    /// let value = error.to_error_value();
    /// assert_eq!(value["kind"], "invalid_request");
    /// assert!(value["error"].as_str().unwrap().contains("POST"));
    /// ```
    #[must_use]
    pub fn to_error_value(&self) -> Value {
        json!({
            "error": self.to_string(),
            "kind": self.kind(),
        })
    }
}

// Verify HttpError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpError>();
};
