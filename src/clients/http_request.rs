//! Outbound partner API request type.
//!
//! An [`ApiRequest`] names one partner API call: its path, method, optional
//! JSON body and the optional shop credentials it is made with. Signing and
//! the common query parameters are added by the
//! [`PartnerClient`](crate::clients::PartnerClient).

use std::fmt;

use serde_json::Value;

use crate::clients::errors::InvalidRequestError;

/// HTTP methods used by the partner API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET; only query parameters are sent.
    Get,
    /// HTTP POST; a JSON body is sent with the query parameters.
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// A partner API call.
///
/// # Example
///
/// ```rust
/// use shopee_bridge::clients::{ApiRequest, HttpMethod};
/// use serde_json::json;
///
/// // Partner-level call
/// let exchange = ApiRequest::post("/api/v2/auth/token/get", json!({"code": "abc"}));
/// assert!(exchange.access_token.is_none());
///
/// // Shop-level call
/// let update = ApiRequest::post("/api/v2/product/update_stock", json!({"item_id": 1}))
///     .with_shop_credentials("access-token", "9");
/// assert_eq!(update.shop_id.as_deref(), Some("9"));
/// assert_eq!(update.http_method, HttpMethod::Post);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The API path, starting with `/`.
    pub path: String,
    /// The JSON body, if any.
    pub body: Option<Value>,
    /// Access token to sign with and send as a query parameter.
    pub access_token: Option<String>,
    /// Shop ID to sign with and send as a query parameter.
    pub shop_id: Option<String>,
}

impl ApiRequest {
    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            http_method: HttpMethod::Get,
            path: path.into(),
            body: None,
            access_token: None,
            shop_id: None,
        }
    }

    /// Creates a POST request with a JSON body.
    #[must_use]
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            http_method: HttpMethod::Post,
            path: path.into(),
            body: Some(body),
            access_token: None,
            shop_id: None,
        }
    }

    /// Sets the access token.
    #[must_use]
    pub fn access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    /// Sets the shop ID.
    #[must_use]
    pub fn shop_id(mut self, shop_id: impl Into<String>) -> Self {
        self.shop_id = Some(shop_id.into());
        self
    }

    /// Sets both the access token and the shop ID.
    #[must_use]
    pub fn with_shop_credentials(
        self,
        access_token: impl Into<String>,
        shop_id: impl Into<String>,
    ) -> Self {
        self.access_token(access_token).shop_id(shop_id)
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequestError`] if:
    /// - the path does not start with `/`
    /// - `http_method` is `Post` but `body` is `None`
    pub fn verify(&self) -> Result<(), InvalidRequestError> {
        if !self.path.starts_with('/') {
            return Err(InvalidRequestError::RelativePath {
                path: self.path.clone(),
            });
        }

        if self.http_method == HttpMethod::Post && self.body.is_none() {
            return Err(InvalidRequestError::MissingBody {
                method: self.http_method.to_string(),
            });
        }

        Ok(())
    }
}
