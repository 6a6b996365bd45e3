//! Signed dispatcher for partner API calls.
//!
//! This module provides the [`PartnerClient`] type. Every call it makes is
//! stamped with the current Unix timestamp, signed, and sent with the common
//! `partner_id`, `timestamp` and `sign` query parameters.

use chrono::Utc;
use serde_json::Value;

use crate::auth::Signer;
use crate::clients::errors::HttpError;
use crate::clients::http_request::{ApiRequest, HttpMethod};
use crate::config::{BaseUrl, BridgeConfig};

/// Crate version from Cargo.toml.
pub const BRIDGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for the partner API.
///
/// The client handles:
/// - Signing every request with the partner key
/// - The common query parameters, plus `access_token` and `shop_id` when present
/// - A per-call timeout taken from [`BridgeConfig::http_timeout`]
///
/// Upstream responses are returned verbatim, including responses that carry
/// an `error` field or a non-2xx status. Only transport failures are errors.
///
/// # Thread Safety
///
/// `PartnerClient` is `Send + Sync`, making it safe to share across handlers.
///
/// # Example
///
/// ```rust,ignore
/// use shopee_bridge::clients::{ApiRequest, PartnerClient};
/// use serde_json::json;
///
/// let client = PartnerClient::new(&config)?;
/// let request = ApiRequest::post("/api/v2/product/update_stock", json!({"item_id": 1}))
///     .with_shop_credentials("access-token", "9");
///
/// let response = client.send(request).await;
/// if response.get("error").is_some() {
///     println!("Call failed: {response}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PartnerClient {
    client: reqwest::Client,
    base_url: BaseUrl,
    signer: Signer,
    user_agent: String,
}

// Verify PartnerClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PartnerClient>();
};

impl PartnerClient {
    /// Creates a client for the configured partner.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying HTTP client cannot be
    /// built (for example, TLS initialization failure).
    pub fn new(config: &BridgeConfig) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}Shopee Partner Bridge v{BRIDGE_VERSION}");

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.http_timeout())
            .build()
            .map_err(HttpError::Network)?;

        Ok(Self {
            client,
            base_url: config.base_url().clone(),
            signer: config.signer(),
            user_agent,
        })
    }

    /// Returns the base URL calls are sent to.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the signer used for every call.
    #[must_use]
    pub const fn signer(&self) -> &Signer {
        &self.signer
    }

    /// Returns the User-Agent header sent with every call.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Sends a call and returns the decoded response, or a structured error
    /// value of the form `{"error": ..., "kind": ...}` on transport failure.
    ///
    /// This never fails: callers that need to tell transport failures apart
    /// from upstream responses use [`try_send`](Self::try_send).
    pub async fn send(&self, request: ApiRequest) -> Value {
        let path = request.path.clone();
        match self.try_send(request).await {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(path = %path, kind = error.kind(), "Partner API call failed: {error}");
                error.to_error_value()
            }
        }
    }

    /// Sends a call and returns the decoded response.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - The connection fails (`Network`)
    /// - The call exceeds the configured timeout (`Timeout`)
    /// - The response body is not JSON (`Decode`)
    pub async fn try_send(&self, request: ApiRequest) -> Result<Value, HttpError> {
        request.verify()?;

        let timestamp = Utc::now().timestamp();
        let access_token = request.access_token.as_deref().filter(|t| !t.is_empty());
        let shop_id = request.shop_id.as_deref().filter(|s| !s.is_empty());
        let sign = self
            .signer
            .sign_parts(&request.path, timestamp, access_token, shop_id);

        let mut query: Vec<(&str, String)> = vec![
            ("partner_id", self.signer.partner_id().to_string()),
            ("timestamp", timestamp.to_string()),
            ("sign", sign),
        ];
        if let Some(access_token) = access_token {
            query.push(("access_token", access_token.to_string()));
        }
        if let Some(shop_id) = shop_id {
            query.push(("shop_id", shop_id.to_string()));
        }

        let url = self.base_url.join(&request.path);
        tracing::debug!(
            method = %request.http_method,
            path = %request.path,
            timestamp,
            authenticated = access_token.is_some() && shop_id.is_some(),
            "Sending partner API call"
        );

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };
        req_builder = req_builder
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .query(&query);
        if let Some(body) = &request.body {
            req_builder = req_builder.json(body);
        }

        let res = req_builder.send().await?;
        let status = res.status().as_u16();
        let body_text = res.text().await?;

        let body: Value = serde_json::from_str(&body_text).map_err(|e| HttpError::Decode {
            status,
            message: e.to_string(),
        })?;

        if let Some(error) = upstream_error(&body) {
            tracing::warn!(path = %request.path, status, error, "Partner API reported an error");
        }

        Ok(body)
    }
}

/// Returns the upstream `error` code when the payload reports one.
///
/// The platform sends `"error": ""` on success, so only a non-empty string
/// counts as a failure.
#[must_use]
pub fn upstream_error(body: &Value) -> Option<&str> {
    body.get("error")
        .and_then(Value::as_str)
        .filter(|error| !error.is_empty())
}
