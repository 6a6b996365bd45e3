//! Configuration types for the Shopee partner bridge.
//!
//! This module provides the configuration the bridge is started with: the
//! partner identity used to sign every request, the partner API base URL, the
//! OAuth redirect URI and the outbound HTTP timeout.
//!
//! # Overview
//!
//! - [`BridgeConfig`]: The main configuration struct
//! - [`BridgeConfigBuilder`]: A builder for constructing [`BridgeConfig`] instances
//! - [`PartnerId`]: A validated partner ID
//! - [`PartnerKey`]: A validated partner key with masked debug output
//! - [`BaseUrl`]: A validated partner API base URL
//! - [`RedirectUri`]: A validated OAuth redirect URI
//!
//! # Example
//!
//! ```rust
//! use shopee_bridge::{BridgeConfig, PartnerId, PartnerKey};
//!
//! let config = BridgeConfig::builder()
//!     .partner_id(PartnerId::new(123).unwrap())
//!     .partner_key(PartnerKey::new("my-partner-key").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.base_url().as_ref(), "https://partner.test-stable.shopeemobile.com");
//! ```

mod newtypes;

pub use newtypes::{BaseUrl, PartnerId, PartnerKey, RedirectUri};

use std::time::Duration;

use crate::auth::Signer;
use crate::error::ConfigError;

/// Environment variable holding the partner ID.
pub const PARTNER_ID_VAR: &str = "SHOPEE_PARTNER_ID";
/// Environment variable holding the partner key.
pub const PARTNER_KEY_VAR: &str = "SHOPEE_PARTNER_KEY";
/// Environment variable holding the partner API base URL.
pub const BASE_URL_VAR: &str = "SHOPEE_BASE_URL";
/// Environment variable holding the OAuth redirect URI.
pub const REDIRECT_URI_VAR: &str = "SHOPEE_REDIRECT_URI";
/// Environment variable holding the outbound HTTP timeout in seconds.
pub const HTTP_TIMEOUT_VAR: &str = "SHOPEE_HTTP_TIMEOUT_SECS";

/// Timeout applied to every outbound partner API call unless configured.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Configuration for the Shopee partner bridge.
///
/// # Thread Safety
///
/// `BridgeConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across request handlers.
#[derive(Clone, Debug)]
pub struct BridgeConfig {
    partner_id: PartnerId,
    partner_key: PartnerKey,
    base_url: BaseUrl,
    redirect_uri: Option<RedirectUri>,
    http_timeout: Duration,
    user_agent_prefix: Option<String>,
}

impl BridgeConfig {
    /// Creates a new builder for constructing a `BridgeConfig`.
    #[must_use]
    pub fn builder() -> BridgeConfigBuilder {
        BridgeConfigBuilder::new()
    }

    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] when the partner ID or
    /// partner key variables are unset, or a validation error for malformed
    /// values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// See [`BridgeConfig::from_env`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use shopee_bridge::BridgeConfig;
    ///
    /// let vars = HashMap::from([
    ///     ("SHOPEE_PARTNER_ID", "123"),
    ///     ("SHOPEE_PARTNER_KEY", "secret"),
    /// ]);
    ///
    /// let config = BridgeConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();
    /// assert_eq!(config.partner_id().get(), 123);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let partner_id = var(PARTNER_ID_VAR)
            .ok_or(ConfigError::MissingRequiredField {
                field: PARTNER_ID_VAR,
            })?
            .parse::<PartnerId>()?;
        let partner_key = PartnerKey::new(var(PARTNER_KEY_VAR).ok_or(
            ConfigError::MissingRequiredField {
                field: PARTNER_KEY_VAR,
            },
        )?)?;

        let mut builder = Self::builder()
            .partner_id(partner_id)
            .partner_key(partner_key);

        if let Some(base_url) = var(BASE_URL_VAR) {
            builder = builder.base_url(BaseUrl::new(base_url)?);
        }
        if let Some(redirect_uri) = var(REDIRECT_URI_VAR) {
            builder = builder.redirect_uri(RedirectUri::new(redirect_uri)?);
        }
        if let Some(timeout) = var(HTTP_TIMEOUT_VAR) {
            builder = builder.http_timeout(parse_timeout(&timeout)?);
        }

        builder.build()
    }

    /// Returns the partner ID.
    #[must_use]
    pub const fn partner_id(&self) -> PartnerId {
        self.partner_id
    }

    /// Returns the partner key.
    #[must_use]
    pub const fn partner_key(&self) -> &PartnerKey {
        &self.partner_key
    }

    /// Returns the partner API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the OAuth redirect URI, if configured.
    #[must_use]
    pub const fn redirect_uri(&self) -> Option<&RedirectUri> {
        self.redirect_uri.as_ref()
    }

    /// Returns the timeout applied to outbound partner API calls.
    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        self.http_timeout
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns a [`Signer`] bound to this configuration's partner identity.
    #[must_use]
    pub fn signer(&self) -> Signer {
        Signer::new(self.partner_id, self.partner_key.clone())
    }
}

// Verify BridgeConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BridgeConfig>();
};

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout {
            value: value.to_string(),
        }),
    }
}

/// Builder for constructing [`BridgeConfig`] instances.
///
/// Required fields are `partner_id` and `partner_key`.
///
/// # Defaults
///
/// - `base_url`: the Shopee test environment
/// - `redirect_uri`: `None`
/// - `http_timeout`: [`DEFAULT_HTTP_TIMEOUT`]
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct BridgeConfigBuilder {
    partner_id: Option<PartnerId>,
    partner_key: Option<PartnerKey>,
    base_url: Option<BaseUrl>,
    redirect_uri: Option<RedirectUri>,
    http_timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl BridgeConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the partner ID (required).
    #[must_use]
    pub const fn partner_id(mut self, id: PartnerId) -> Self {
        self.partner_id = Some(id);
        self
    }

    /// Sets the partner key (required).
    #[must_use]
    pub fn partner_key(mut self, key: PartnerKey) -> Self {
        self.partner_key = Some(key);
        self
    }

    /// Sets the partner API base URL.
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the OAuth redirect URI.
    #[must_use]
    pub fn redirect_uri(mut self, uri: RedirectUri) -> Self {
        self.redirect_uri = Some(uri);
        self
    }

    /// Sets the timeout for outbound partner API calls.
    #[must_use]
    pub const fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    /// Sets the user agent prefix for outbound HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`BridgeConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `partner_id` or
    /// `partner_key` are not set, and [`ConfigError::InvalidTimeout`] for a
    /// zero timeout.
    pub fn build(self) -> Result<BridgeConfig, ConfigError> {
        let partner_id = self
            .partner_id
            .ok_or(ConfigError::MissingRequiredField {
                field: "partner_id",
            })?;
        let partner_key = self
            .partner_key
            .ok_or(ConfigError::MissingRequiredField {
                field: "partner_key",
            })?;

        let http_timeout = self.http_timeout.unwrap_or(DEFAULT_HTTP_TIMEOUT);
        if http_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout {
                value: "0".to_string(),
            });
        }

        Ok(BridgeConfig {
            partner_id,
            partner_key,
            base_url: self.base_url.unwrap_or_else(BaseUrl::test_environment),
            redirect_uri: self.redirect_uri,
            http_timeout,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
