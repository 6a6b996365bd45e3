//! Authentication types for the Shopee partner bridge.
//!
//! This module provides request signing, per-shop credential storage and
//! the authorization flow that connects a shop.
//!
//! # Overview
//!
//! - [`Signer`]: HMAC-SHA256 signatures for partner API calls
//! - [`SignatureRequest`]: The inputs of one signature, authenticated or not
//! - [`CredentialRecord`]: The tokens held for one connected shop
//! - [`TokenStore`]: Storage seam for credential records
//! - [`InMemoryTokenStore`]: The process-lifetime store the bridge ships with
//! - [`resolve_credentials`]: Session-then-store credential lookup
//! - [`oauth`]: Authorization URL, code exchange and token refresh
//!
//! # Connecting a Shop
//!
//! ```rust,ignore
//! use shopee_bridge::auth::oauth::{begin_auth, complete_auth, AuthCallback};
//!
//! // 1. Send the merchant to the platform
//! let result = begin_auth(&config, chrono::Utc::now().timestamp())?;
//! // Redirect to result.auth_url
//!
//! // 2. The platform redirects back with ?code=...&shop_id=...
//! let record = complete_auth(&client, &store, &callback).await?;
//! println!("Connected {}", record.shop_name);
//! ```

mod credential;
pub mod oauth;
mod resolve;
mod signer;
mod store;

pub use credential::{CredentialRecord, TokenResponse};
pub use resolve::{
    requested_shop_id, resolve_credentials, CredentialSource, ResolvedCredentials,
    SessionCredentials,
};
pub use signer::{compute_signature, SignatureRequest, Signer};
pub use store::{InMemoryTokenStore, TokenStore};
