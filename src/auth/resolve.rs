//! Credential resolution for shop-level calls.
//!
//! Mutation endpoints accept credentials from two places. Resolution follows
//! a fixed precedence:
//!
//! 1. The caller's web session, when it holds an access token and shop ID.
//! 2. A `shop_id` named in the request body, looked up in the token store.
//!
//! Anything else is [`OAuthError::NotAuthorized`].

use serde_json::Value;

use crate::auth::oauth::OAuthError;
use crate::auth::store::TokenStore;

/// Credentials remembered in a merchant's web session after authorization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionCredentials {
    /// The shop's access token.
    pub access_token: String,
    /// The shop's refresh token.
    pub refresh_token: String,
    /// The shop ID.
    pub shop_id: String,
    /// Access token lifetime in seconds.
    pub expire_in: Option<u64>,
}

/// Where resolved credentials came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialSource {
    /// The caller's web session.
    Session,
    /// The token store, via a `shop_id` in the request.
    Store,
}

/// An access token and shop ID ready for signing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedCredentials {
    /// The shop's access token.
    pub access_token: String,
    /// The shop ID.
    pub shop_id: String,
    /// Where the credentials came from.
    pub source: CredentialSource,
}

/// Resolves the credentials for a shop-level call.
///
/// # Errors
///
/// Returns [`OAuthError::NotAuthorized`] when the session holds no usable
/// credentials and the requested shop is absent or not connected.
///
/// # Example
///
/// ```rust
/// use shopee_bridge::auth::{resolve_credentials, CredentialSource, InMemoryTokenStore, SessionCredentials};
///
/// let store = InMemoryTokenStore::new();
/// let session = SessionCredentials {
///     access_token: "AT".to_string(),
///     refresh_token: "RT".to_string(),
///     shop_id: "9".to_string(),
///     expire_in: None,
/// };
///
/// let resolved = resolve_credentials(Some(&session), Some("10"), &store).unwrap();
/// assert_eq!(resolved.shop_id, "9");
/// assert_eq!(resolved.source, CredentialSource::Session);
///
/// assert!(resolve_credentials(None, Some("10"), &store).is_err());
/// ```
pub fn resolve_credentials(
    session: Option<&SessionCredentials>,
    requested_shop_id: Option<&str>,
    store: &dyn TokenStore,
) -> Result<ResolvedCredentials, OAuthError> {
    if let Some(session) =
        session.filter(|s| !s.access_token.is_empty() && !s.shop_id.is_empty())
    {
        return Ok(ResolvedCredentials {
            access_token: session.access_token.clone(),
            shop_id: session.shop_id.clone(),
            source: CredentialSource::Session,
        });
    }

    let shop_id = requested_shop_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| OAuthError::NotAuthorized {
            reason: "no session credentials and no shop_id in request".to_string(),
        })?;

    let record = store.get(shop_id).ok_or_else(|| OAuthError::NotAuthorized {
        reason: format!("shop {shop_id} is not connected"),
    })?;

    Ok(ResolvedCredentials {
        access_token: record.access_token,
        shop_id: record.shop_id,
        source: CredentialSource::Store,
    })
}

/// Reads the `shop_id` field of a request body as a string.
///
/// Accepts either a JSON string or a JSON integer.
#[must_use]
pub fn requested_shop_id(body: &Value) -> Option<String> {
    match body.get("shop_id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.is_u64() || n.is_i64() => Some(n.to_string()),
        _ => None,
    }
}
