//! Authorization error types for the Shopee partner bridge.
//!
//! # Error Types
//!
//! - [`OAuthError::InvalidCallback`]: Callback parameters are missing or malformed
//! - [`OAuthError::MissingRedirectUri`]: No redirect URI configured for `begin_auth`
//! - [`OAuthError::NotAuthorized`]: No usable credentials for a shop-level call
//! - [`OAuthError::Upstream`]: The partner API rejected the call
//! - [`OAuthError::InvalidTokenResponse`]: A token payload could not be read
//! - [`OAuthError::Transport`]: Wrapped HTTP client error
//!
//! # Example
//!
//! ```rust
//! use shopee_bridge::auth::oauth::OAuthError;
//!
//! let error = OAuthError::InvalidCallback {
//!     reason: "Missing code or shop_id".to_string(),
//! };
//! assert_eq!(error.to_string(), "Invalid callback: Missing code or shop_id");
//! ```

use serde_json::Value;
use thiserror::Error;

use crate::clients::HttpError;

/// Errors that can occur while authorizing a shop or using its tokens.
///
/// # Thread Safety
///
/// `OAuthError` is `Send + Sync`, making it safe to use across async boundaries.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// Callback parameters are invalid or malformed.
    #[error("Invalid callback: {reason}")]
    InvalidCallback {
        /// Description of what's invalid about the callback.
        reason: String,
    },

    /// `begin_auth` was called without a configured redirect URI.
    #[error("A redirect URI must be configured to begin authorization")]
    MissingRedirectUri,

    /// No credentials could be resolved for a shop-level call.
    #[error("Not authorized. Please connect shop first ({reason})")]
    NotAuthorized {
        /// Why resolution failed.
        reason: String,
    },

    /// The partner API answered with a non-empty `error` field.
    ///
    /// `payload` is the full upstream response, relayed to the caller as-is.
    #[error("Partner API error '{error}': {message}")]
    Upstream {
        /// The upstream error code.
        error: String,
        /// The upstream message, empty if none was sent.
        message: String,
        /// The complete upstream response.
        payload: Value,
    },

    /// A successful response did not contain a usable token payload.
    #[error("Invalid token response: {reason}")]
    InvalidTokenResponse {
        /// Description of the decoding failure.
        reason: String,
    },

    /// Wrapped HTTP client error.
    #[error(transparent)]
    Transport(#[from] HttpError),
}

impl OAuthError {
    /// Builds an [`OAuthError::Upstream`] from a response that reports an error.
    ///
    /// Returns `None` when the response's `error` field is absent or empty.
    #[must_use]
    pub fn from_upstream(payload: &Value) -> Option<Self> {
        let error = crate::clients::upstream_error(payload)?.to_string();
        let message = payload
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Some(Self::Upstream {
            error,
            message,
            payload: payload.clone(),
        })
    }
}

// Verify OAuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthError>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::InvalidRequestError;
    use serde_json::json;

    #[test]
    fn test_not_authorized_message() {
        let error = OAuthError::NotAuthorized {
            reason: "shop 9 is not connected".to_string(),
        };
        let message = error.to_string();
        assert!(message.starts_with("Not authorized. Please connect shop first"));
        assert!(message.contains("shop 9"));
    }

    #[test]
    fn test_from_upstream_keeps_payload() {
        let payload = json!({
            "error": "error_auth",
            "message": "Invalid code",
            "request_id": "abc"
        });

        match OAuthError::from_upstream(&payload) {
            Some(OAuthError::Upstream {
                error,
                message,
                payload: kept,
            }) => {
                assert_eq!(error, "error_auth");
                assert_eq!(message, "Invalid code");
                assert_eq!(kept, payload);
            }
            other => panic!("Expected Upstream, got {other:?}"),
        }
    }

    #[test]
    fn test_from_upstream_ignores_success_payloads() {
        assert!(OAuthError::from_upstream(&json!({"error": "", "access_token": "AT"})).is_none());
        assert!(OAuthError::from_upstream(&json!({"access_token": "AT"})).is_none());
    }

    #[test]
    fn test_from_http_error_conversion() {
        let http_error = HttpError::from(InvalidRequestError::RelativePath {
            path: "api".to_string(),
        });
        let oauth_error: OAuthError = http_error.into();
        assert!(matches!(oauth_error, OAuthError::Transport(_)));
    }

    #[test]
    fn test_oauth_error_implements_std_error() {
        let error: &dyn std::error::Error = &OAuthError::MissingRedirectUri;
        let _ = error;
    }
}
