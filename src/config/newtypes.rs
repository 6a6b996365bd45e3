//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around the partner credentials and
//! URLs the bridge is configured with. Invalid values are rejected on
//! construction with clear error messages.

use crate::error::ConfigError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A validated Shopee partner ID.
///
/// Partner IDs are positive integers issued by the Shopee Open Platform. The
/// decimal form is part of every signature base string.
///
/// # Example
///
/// ```rust
/// use shopee_bridge::PartnerId;
///
/// let id: PartnerId = "2001234".parse().unwrap();
/// assert_eq!(id.get(), 2_001_234);
/// assert_eq!(id.to_string(), "2001234");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PartnerId(u64);

impl PartnerId {
    /// Creates a new validated partner ID.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPartnerId`] if the ID is zero.
    pub fn new(id: u64) -> Result<Self, ConfigError> {
        if id == 0 {
            return Err(ConfigError::InvalidPartnerId {
                value: id.to_string(),
            });
        }
        Ok(Self(id))
    }

    /// Returns the numeric partner ID.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl FromStr for PartnerId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidPartnerId {
                value: s.to_string(),
            })?;
        Self::new(id)
    }
}

impl fmt::Display for PartnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for PartnerId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.0)
    }
}

/// A validated Shopee partner key.
///
/// The partner key is the HMAC secret for every signed request. It is never
/// serialized and its `Debug` output is masked.
///
/// # Example
///
/// ```rust
/// use shopee_bridge::PartnerKey;
///
/// let key = PartnerKey::new("my-partner-key").unwrap();
/// assert_eq!(format!("{:?}", key), "PartnerKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PartnerKey(String);

impl PartnerKey {
    /// Creates a new validated partner key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPartnerKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key: String = key.into();
        if key.is_empty() {
            return Err(ConfigError::EmptyPartnerKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for PartnerKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PartnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PartnerKey(*****)")
    }
}

/// A validated base URL of the partner API.
///
/// Trailing slashes are trimmed so API paths (which start with `/`) can be
/// appended directly.
///
/// # Example
///
/// ```rust
/// use shopee_bridge::BaseUrl;
///
/// let url = BaseUrl::new("https://partner.shopeemobile.com/").unwrap();
/// assert_eq!(url.as_ref(), "https://partner.shopeemobile.com");
/// assert_eq!(url.join("/api/v2/auth/token/get"), "https://partner.shopeemobile.com/api/v2/auth/token/get");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
    host_start: usize,
    host_end: usize,
}

impl BaseUrl {
    /// The Shopee test environment used when no base URL is configured.
    pub const TEST_ENVIRONMENT: &'static str = "https://partner.test-stable.shopeemobile.com";

    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if the URL has no scheme or host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url: String = url.into();
        let url = url.trim().trim_end_matches('/').to_string();
        let (host_start, host_end) = parse_absolute_url(&url)
            .ok_or_else(|| ConfigError::InvalidUrl {
                field: "base_url",
                url: url.clone(),
            })?;

        Ok(Self {
            url,
            host_start,
            host_end,
        })
    }

    /// Returns the Shopee test environment base URL.
    #[must_use]
    pub fn test_environment() -> Self {
        Self {
            url: Self::TEST_ENVIRONMENT.to_string(),
            host_start: "https://".len(),
            host_end: Self::TEST_ENVIRONMENT.len(),
        }
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.url[self.host_start..self.host_end]
    }

    /// Returns `true` when the URL points at a Shopee test environment.
    #[must_use]
    pub fn is_test_environment(&self) -> bool {
        self.host_name().contains(".test-stable.")
    }

    /// Appends an API path to the base URL.
    #[must_use]
    pub fn join(&self, api_path: &str) -> String {
        format!("{}{}", self.url, api_path)
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

/// A validated redirect URI the platform sends the merchant back to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedirectUri(String);

impl RedirectUri {
    /// Creates a new validated redirect URI.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if the URI has no scheme or host.
    pub fn new(uri: impl Into<String>) -> Result<Self, ConfigError> {
        let uri: String = uri.into();
        let uri = uri.trim().to_string();
        if parse_absolute_url(&uri).is_none() {
            return Err(ConfigError::InvalidUrl {
                field: "redirect_uri",
                url: uri,
            });
        }
        Ok(Self(uri))
    }
}

impl AsRef<str> for RedirectUri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Returns the byte range of the host within an absolute URL.
fn parse_absolute_url(url: &str) -> Option<(usize, usize)> {
    let scheme_end = url.find("://")?;
    let scheme = &url[..scheme_end];
    if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let host_start = scheme_end + 3;
    if host_start >= url.len() {
        return None;
    }

    // Host ends at port, path, query, or end of string
    let host_end = url[host_start..]
        .find([':', '/', '?', '#'])
        .map_or(url.len(), |i| host_start + i);

    if host_end == host_start || url[host_start..host_end].contains(char::is_whitespace) {
        return None;
    }

    Some((host_start, host_end))
}
