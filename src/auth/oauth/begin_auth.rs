//! Authorization URL generation.
//!
//! This module provides the [`begin_auth`] function, the first step of
//! connecting a shop. It builds the signed `auth_partner` URL the merchant is
//! redirected to; the platform later redirects back to the configured
//! redirect URI with `code` and `shop_id`.
//!
//! The URL carries an unauthenticated signature:
//! `HMAC(partner_key, partner_id + "/api/v2/shop/auth_partner" + timestamp)`.

use crate::auth::oauth::error::OAuthError;
use crate::auth::SignatureRequest;
use crate::config::BridgeConfig;

/// Path of the consent page on the partner API host.
pub const AUTH_PARTNER_PATH: &str = "/api/v2/shop/auth_partner";

/// Result of initiating authorization.
#[derive(Clone, Debug)]
pub struct BeginAuthResult {
    /// The full authorization URL to redirect the merchant to.
    pub auth_url: String,

    /// The Unix timestamp the URL was signed with.
    pub timestamp: i64,
}

/// Builds the authorization URL for the given timestamp.
///
/// # Errors
///
/// Returns [`OAuthError::MissingRedirectUri`] if `config.redirect_uri()` is `None`.
///
/// # Example
///
/// ```rust
/// use shopee_bridge::{BridgeConfig, PartnerId, PartnerKey, RedirectUri};
/// use shopee_bridge::auth::oauth::begin_auth;
///
/// let config = BridgeConfig::builder()
///     .partner_id(PartnerId::new(123).unwrap())
///     .partner_key(PartnerKey::new("secret").unwrap())
///     .redirect_uri(RedirectUri::new("https://bridge.example.com/auth/callback").unwrap())
///     .build()
///     .unwrap();
///
/// let result = begin_auth(&config, 1_700_000_000).unwrap();
/// assert!(result.auth_url.starts_with(
///     "https://partner.test-stable.shopeemobile.com/api/v2/shop/auth_partner?partner_id=123"
/// ));
/// assert!(result.auth_url.contains("redirect=https%3A%2F%2Fbridge.example.com%2Fauth%2Fcallback"));
/// ```
pub fn begin_auth(config: &BridgeConfig, timestamp: i64) -> Result<BeginAuthResult, OAuthError> {
    let redirect_uri = config
        .redirect_uri()
        .ok_or(OAuthError::MissingRedirectUri)?;

    let signature = config.signer().sign(&SignatureRequest::unauthenticated(
        config.partner_id(),
        AUTH_PARTNER_PATH,
        timestamp,
    ));

    let params = [
        ("partner_id", config.partner_id().to_string()),
        ("timestamp", timestamp.to_string()),
        ("sign", signature),
        ("redirect", redirect_uri.as_ref().to_string()),
    ];

    let query_string = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let auth_url = format!("{}?{}", config.base_url().join(AUTH_PARTNER_PATH), query_string);

    tracing::info!(partner_id = %config.partner_id(), timestamp, "Built authorization URL");

    Ok(BeginAuthResult {
        auth_url,
        timestamp,
    })
}

// Verify BeginAuthResult is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BeginAuthResult>();
};
