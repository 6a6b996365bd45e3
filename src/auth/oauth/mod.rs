//! Shop authorization for the Shopee partner API.
//!
//! Connecting a shop is a two-step redirect flow:
//!
//! 1. **Authorization Initiation** ([`begin_auth`]): Build the signed consent
//!    URL and redirect the merchant to it.
//!
//! 2. **Callback Handling** ([`complete_auth`]): When the merchant is
//!    redirected back, exchange the code for tokens and store them.
//!
//! Access tokens expire; [`refresh_access_token`] mints a new pair from the
//! refresh token.
//!
//! Progress through the flow is tracked per web session with
//! [`AuthorizationState`].
//!
//! # Security
//!
//! - Every call is HMAC-signed with the partner key
//! - The partner key never leaves the process and is never logged
//! - Tokens are never logged

mod begin_auth;
mod callback;
mod error;
mod state;
mod token_refresh;

pub use begin_auth::{begin_auth, BeginAuthResult, AUTH_PARTNER_PATH};
pub use callback::{complete_auth, exchange_code, AuthCallback, ValidatedCallback, TOKEN_GET_PATH};
pub use error::OAuthError;
pub use state::AuthorizationState;
pub use token_refresh::{refresh_access_token, ACCESS_TOKEN_GET_PATH};
