//! Authorization callback handling.
//!
//! After consent, the platform redirects the merchant to the redirect URI
//! with `code`, `shop_id` and optionally `shop_name`. [`complete_auth`]
//! validates those parameters, exchanges the code for tokens and records the
//! result in the token store.
//!
//! Nothing is stored unless the exchange succeeds.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::oauth::error::OAuthError;
use crate::auth::{CredentialRecord, TokenResponse, TokenStore};
use crate::clients::{ApiRequest, PartnerClient};

/// Path of the code exchange endpoint.
pub const TOKEN_GET_PATH: &str = "/api/v2/auth/token/get";

/// Query parameters of the authorization callback.
///
/// Every field is optional so a malformed callback can be reported as
/// [`OAuthError::InvalidCallback`] instead of a deserialization failure.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct AuthCallback {
    /// The one-time authorization code.
    #[serde(default)]
    pub code: Option<String>,
    /// The authorized shop.
    #[serde(default)]
    pub shop_id: Option<String>,
    /// Display name of the shop, if the platform sent one.
    #[serde(default)]
    pub shop_name: Option<String>,
}

/// A callback whose parameters passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedCallback<'a> {
    /// The one-time authorization code.
    pub code: &'a str,
    /// The authorized shop, as sent.
    pub shop_id: &'a str,
    /// The shop ID as the integer the exchange body requires.
    pub shop_id_number: u64,
    /// Display name of the shop, if any.
    pub shop_name: Option<&'a str>,
}

impl AuthCallback {
    /// Checks that `code` and a numeric `shop_id` are present.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::InvalidCallback`] when either parameter is
    /// missing or empty, or when `shop_id` is not an integer.
    pub fn validate(&self) -> Result<ValidatedCallback<'_>, OAuthError> {
        let code = non_empty(self.code.as_deref());
        let shop_id = non_empty(self.shop_id.as_deref());

        let (Some(code), Some(shop_id)) = (code, shop_id) else {
            return Err(OAuthError::InvalidCallback {
                reason: "Missing code or shop_id".to_string(),
            });
        };

        let shop_id_number = shop_id
            .parse::<u64>()
            .map_err(|_| OAuthError::InvalidCallback {
                reason: format!("shop_id '{shop_id}' is not an integer"),
            })?;

        Ok(ValidatedCallback {
            code,
            shop_id,
            shop_id_number,
            shop_name: non_empty(self.shop_name.as_deref()),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Exchanges an authorization code for shop tokens.
///
/// The call is signed in unauthenticated mode and posts
/// `{code, shop_id, partner_id}`.
///
/// # Errors
///
/// - [`OAuthError::Transport`] if the call could not be completed
/// - [`OAuthError::Upstream`] if the platform rejected the code
/// - [`OAuthError::InvalidTokenResponse`] if no access token came back
pub async fn exchange_code(
    client: &PartnerClient,
    code: &str,
    shop_id: u64,
) -> Result<TokenResponse, OAuthError> {
    let body = json!({
        "code": code,
        "shop_id": shop_id,
        "partner_id": client.signer().partner_id(),
    });

    let response = client
        .try_send(ApiRequest::post(TOKEN_GET_PATH, body))
        .await?;

    parse_token_response(response)
}

/// Completes authorization from callback parameters.
///
/// On success the shop's record is written to `store`, replacing any prior
/// record for the same shop, and returned.
///
/// # Errors
///
/// Returns the errors of [`AuthCallback::validate`] and [`exchange_code`].
/// The store is untouched on error.
///
/// # Example
///
/// ```rust,ignore
/// let callback = AuthCallback {
///     code: Some("abc".to_string()),
///     shop_id: Some("9".to_string()),
///     shop_name: None,
/// };
/// let record = complete_auth(&client, &store, &callback).await?;
/// assert_eq!(record.shop_name, "Shop #9");
/// ```
pub async fn complete_auth(
    client: &PartnerClient,
    store: &dyn TokenStore,
    callback: &AuthCallback,
) -> Result<CredentialRecord, OAuthError> {
    let validated = callback.validate()?;

    let token = exchange_code(client, validated.code, validated.shop_id_number).await?;

    let record =
        CredentialRecord::from_token_response(validated.shop_id, validated.shop_name, &token);
    store.put(record.clone());

    tracing::info!(
        shop_id = %record.shop_id,
        expire_in = ?record.expire_in,
        "Shop authorized"
    );

    Ok(record)
}

/// Reads a token payload, treating a non-empty `error` as a rejection.
pub(crate) fn parse_token_response(response: Value) -> Result<TokenResponse, OAuthError> {
    if let Some(error) = OAuthError::from_upstream(&response) {
        tracing::warn!("Token request rejected: {error}");
        return Err(error);
    }

    let token: TokenResponse =
        serde_json::from_value(response).map_err(|e| OAuthError::InvalidTokenResponse {
            reason: e.to_string(),
        })?;

    if token.access_token.is_empty() {
        return Err(OAuthError::InvalidTokenResponse {
            reason: "response has no access_token".to_string(),
        });
    }

    Ok(token)
}
