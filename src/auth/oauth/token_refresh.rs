//! Access token refresh.
//!
//! Access tokens are short-lived. [`refresh_access_token`] trades a shop's
//! refresh token for a new token pair and applies it to the shop's record in
//! the token store.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopee_bridge::auth::oauth::refresh_access_token;
//!
//! if record.expired() {
//!     let token = refresh_access_token(&client, &store, &record.shop_id, &record.refresh_token).await?;
//!     println!("New token valid for {:?} seconds", token.expire_in);
//! }
//! ```

use chrono::Utc;
use serde_json::json;

use crate::auth::oauth::callback::parse_token_response;
use crate::auth::oauth::OAuthError;
use crate::auth::{TokenResponse, TokenStore};
use crate::clients::{ApiRequest, PartnerClient};

/// Path of the token refresh endpoint.
pub const ACCESS_TOKEN_GET_PATH: &str = "/api/v2/auth/access_token/get";

/// Refreshes a shop's access token.
///
/// Posts `{refresh_token, shop_id, partner_id}` with an unauthenticated
/// signature. On success, the shop's record in `store` is updated when the
/// shop is connected; a shop known only to a web session is refreshed
/// without touching the store.
///
/// # Errors
///
/// - [`OAuthError::InvalidCallback`] if `shop_id` is not an integer
/// - [`OAuthError::Transport`] if the call could not be completed
/// - [`OAuthError::Upstream`] if the platform rejected the refresh token
/// - [`OAuthError::InvalidTokenResponse`] if no access token came back
pub async fn refresh_access_token(
    client: &PartnerClient,
    store: &dyn TokenStore,
    shop_id: &str,
    refresh_token: &str,
) -> Result<TokenResponse, OAuthError> {
    let shop_id = shop_id.trim();
    let shop_id_number = shop_id
        .parse::<u64>()
        .map_err(|_| OAuthError::InvalidCallback {
            reason: format!("shop_id '{shop_id}' is not an integer"),
        })?;

    let body = json!({
        "refresh_token": refresh_token,
        "shop_id": shop_id_number,
        "partner_id": client.signer().partner_id(),
    });

    let response = client
        .try_send(ApiRequest::post(ACCESS_TOKEN_GET_PATH, body))
        .await?;
    let token = parse_token_response(response)?;

    let stored = store.update_tokens(shop_id, &token, Utc::now()).is_some();
    tracing::info!(
        shop_id,
        stored,
        expire_in = ?token.expire_in,
        "Access token refreshed"
    );

    Ok(token)
}
