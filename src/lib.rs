//! # Shopee Partner Bridge
//!
//! A bridge between a merchant-facing web front end and the Shopee partner
//! API: it signs every outbound call, connects shops through the partner
//! authorization flow, keeps their tokens, and exposes price and stock
//! mutations over HTTP.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`BridgeConfig`] and [`BridgeConfigBuilder`]
//! - Validated newtypes for the partner identity and URLs
//! - HMAC-SHA256 request signing via [`auth::Signer`]
//! - Per-shop credential storage behind the [`auth::TokenStore`] trait
//! - Shop authorization and token refresh via [`auth::oauth`]
//! - A signed, timeout-bounded dispatcher via [`clients::PartnerClient`]
//! - Price, stock and batch mutations via [`products`]
//! - An Axum router exposing all of the above via [`server`]
//!
//! ## Quick Start
//!
//! ```rust
//! use shopee_bridge::{BridgeConfig, PartnerId, PartnerKey, RedirectUri};
//!
//! let config = BridgeConfig::builder()
//!     .partner_id(PartnerId::new(123).unwrap())
//!     .partner_key(PartnerKey::new("your-partner-key").unwrap())
//!     .redirect_uri(RedirectUri::new("https://bridge.example.com/auth/callback").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.partner_id().get(), 123);
//! ```
//!
//! ## Connecting a Shop
//!
//! ```rust,ignore
//! use shopee_bridge::auth::InMemoryTokenStore;
//! use shopee_bridge::auth::oauth::{begin_auth, complete_auth, AuthCallback};
//! use shopee_bridge::clients::PartnerClient;
//!
//! let client = PartnerClient::new(&config)?;
//! let store = InMemoryTokenStore::new();
//!
//! // Step 1: Redirect the merchant
//! let result = begin_auth(&config, chrono::Utc::now().timestamp())?;
//!
//! // Step 2: Handle the callback
//! let record = complete_auth(&client, &store, &callback).await?;
//! ```
//!
//! ## Updating Products
//!
//! ```rust,ignore
//! use shopee_bridge::auth::resolve_credentials;
//! use shopee_bridge::products::{update_price, PriceUpdate};
//! use serde_json::json;
//!
//! let credentials = resolve_credentials(None, Some("9"), &store)?;
//! let update = PriceUpdate::from_json(&json!({"item_id": 1001, "price": "199.00"}))?;
//! let response = update_price(&client, &credentials, &update).await;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration and stores are instances passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All shared types are `Send + Sync`
//! - **Secret hygiene**: The partner key and tokens are never logged

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod products;
pub mod server;

// Re-export public types at crate root for convenience
pub use config::{BaseUrl, BridgeConfig, BridgeConfigBuilder, PartnerId, PartnerKey, RedirectUri};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{ApiRequest, HttpError, HttpMethod, PartnerClient};

// Re-export authorization types for convenience
pub use auth::oauth::{
    begin_auth, complete_auth, refresh_access_token, AuthCallback, AuthorizationState,
    BeginAuthResult, OAuthError,
};
pub use auth::{CredentialRecord, InMemoryTokenStore, Signer, TokenStore};
