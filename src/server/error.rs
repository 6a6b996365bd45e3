//! Error responses for the web layer.
//!
//! Every failure is answered with JSON. Most bodies are `{"error": message}`;
//! an upstream rejection is relayed with the partner API's own body.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;

use crate::auth::oauth::OAuthError;
use crate::products::ProductError;

/// Web layer error type.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No usable credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// Missing or malformed input.
    #[error("{0}")]
    BadRequest(String),

    /// The partner API rejected the call; the payload is relayed as-is.
    #[error("Partner API rejected the request")]
    Upstream(Value),

    /// The partner API could not be reached or answered unusably.
    #[error("{0}")]
    BadGateway(String),

    /// The bridge is misconfigured for this operation.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) | Self::Upstream(_) => StatusCode::BAD_REQUEST,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<OAuthError> for ApiError {
    fn from(e: OAuthError) -> Self {
        match e {
            OAuthError::InvalidCallback { reason } => Self::BadRequest(reason),
            OAuthError::NotAuthorized { .. } => {
                Self::Unauthorized("Not authorized. Please connect shop first".to_string())
            }
            OAuthError::Upstream { payload, .. } => Self::Upstream(payload),
            OAuthError::MissingRedirectUri => Self::Internal(e.to_string()),
            OAuthError::InvalidTokenResponse { .. } | OAuthError::Transport(_) => {
                Self::BadGateway(e.to_string())
            }
        }
    }
}

impl From<ProductError> for ApiError {
    fn from(e: ProductError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), "Request failed: {self}");
        }

        let body = match self {
            Self::Upstream(payload) => payload,
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
