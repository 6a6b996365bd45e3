//! Per-shop credential records.
//!
//! This module provides the [`CredentialRecord`] held by the token store and
//! the [`TokenResponse`] returned by the partner API's token endpoints.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Token payload returned by `/api/v2/auth/token/get` and
/// `/api/v2/auth/access_token/get`.
///
/// Only the fields the bridge relies on are typed; everything else the
/// platform sends is ignored.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    /// The new access token.
    #[serde(default)]
    pub access_token: String,
    /// The new refresh token.
    #[serde(default)]
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    #[serde(default)]
    pub expire_in: Option<u64>,
    /// Upstream request identifier, useful when reporting issues.
    #[serde(default)]
    pub request_id: Option<String>,
}

/// The current credentials of one connected shop.
///
/// The serialized form describes the shop and omits both tokens.
///
/// # Example
///
/// ```rust
/// use shopee_bridge::auth::{CredentialRecord, TokenResponse};
///
/// let token = TokenResponse {
///     access_token: "AT".to_string(),
///     refresh_token: "RT".to_string(),
///     expire_in: Some(3600),
///     request_id: None,
/// };
///
/// let record = CredentialRecord::from_token_response("9", None, &token);
/// assert_eq!(record.shop_name, "Shop #9");
/// assert!(!record.expired());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CredentialRecord {
    /// The shop identifier; unique key in the token store.
    pub shop_id: String,
    /// Display label for the shop.
    pub shop_name: String,
    /// Short-lived bearer token for shop-level calls.
    #[serde(skip_serializing)]
    pub access_token: String,
    /// Token used to mint a new access token.
    #[serde(skip_serializing)]
    pub refresh_token: String,
    /// Access token lifetime in seconds, counted from `last_updated`.
    pub expire_in: Option<u64>,
    /// When the shop was connected.
    pub connected_at: DateTime<Utc>,
    /// When the tokens were last issued.
    pub last_updated: DateTime<Utc>,
}

impl CredentialRecord {
    /// Creates a freshly connected record from a code exchange response.
    ///
    /// A missing or blank shop name defaults to `Shop #<shop_id>`.
    #[must_use]
    pub fn from_token_response(
        shop_id: impl Into<String>,
        shop_name: Option<&str>,
        token: &TokenResponse,
    ) -> Self {
        let shop_id: String = shop_id.into();
        let shop_name = shop_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map_or_else(|| format!("Shop #{shop_id}"), ToString::to_string);
        let now = Utc::now();

        Self {
            shop_id,
            shop_name,
            access_token: token.access_token.clone(),
            refresh_token: token.refresh_token.clone(),
            expire_in: token.expire_in,
            connected_at: now,
            last_updated: now,
        }
    }

    /// Replaces the tokens after a refresh, keeping `connected_at`.
    pub fn apply_refresh(&mut self, token: &TokenResponse, at: DateTime<Utc>) {
        self.access_token.clone_from(&token.access_token);
        self.refresh_token.clone_from(&token.refresh_token);
        self.expire_in = token.expire_in;
        self.last_updated = at;
    }

    /// Returns when the access token expires, if the lifetime is known.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.expire_in?).ok()?;
        self.last_updated
            .checked_add_signed(Duration::try_seconds(secs)?)
    }

    /// Returns `true` if the access token has expired.
    ///
    /// Records without a known lifetime are considered never expired.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.expires_at().is_some_and(|expires| Utc::now() > expires)
    }
}

// Verify CredentialRecord is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CredentialRecord>();
};

#[cfg(test)]
mod tests {
    use super::*;

    fn token(access: &str, refresh: &str, expire_in: Option<u64>) -> TokenResponse {
        TokenResponse {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
            expire_in,
            request_id: None,
        }
    }

    #[test]
    fn test_token_response_ignores_unknown_fields() {
        let json = serde_json::json!({
            "access_token": "AT",
            "refresh_token": "RT",
            "expire_in": 14400,
            "request_id": "req-1",
            "error": "",
            "message": "",
            "shop_id_list": [9]
        });

        let token: TokenResponse = serde_json::from_value(json).unwrap();
        assert_eq!(token.access_token, "AT");
        assert_eq!(token.refresh_token, "RT");
        assert_eq!(token.expire_in, Some(14400));
        assert_eq!(token.request_id.as_deref(), Some("req-1"));
    }

    #[test]
    fn test_record_uses_supplied_shop_name() {
        let record = CredentialRecord::from_token_response("9", Some("Noodle House"), &token("AT", "RT", None));
        assert_eq!(record.shop_name, "Noodle House");
        assert_eq!(record.connected_at, record.last_updated);
    }

    #[test]
    fn test_record_defaults_blank_shop_name() {
        let record = CredentialRecord::from_token_response("9", Some("  "), &token("AT", "RT", None));
        assert_eq!(record.shop_name, "Shop #9");
    }

    #[test]
    fn test_apply_refresh_keeps_connected_at() {
        let mut record =
            CredentialRecord::from_token_response("9", None, &token("AT", "RT", Some(3600)));
        let connected_at = record.connected_at;
        let later = connected_at + Duration::minutes(30);

        record.apply_refresh(&token("AT2", "RT2", Some(7200)), later);

        assert_eq!(record.access_token, "AT2");
        assert_eq!(record.refresh_token, "RT2");
        assert_eq!(record.expire_in, Some(7200));
        assert_eq!(record.connected_at, connected_at);
        assert_eq!(record.last_updated, later);
    }

    #[test]
    fn test_expired() {
        let mut record =
            CredentialRecord::from_token_response("9", None, &token("AT", "RT", Some(3600)));
        assert!(!record.expired());

        record.last_updated = Utc::now() - Duration::hours(2);
        assert!(record.expired());

        record.expire_in = None;
        assert!(!record.expired());
    }

    #[test]
    fn test_record_serializes_timestamps() {
        let record = CredentialRecord::from_token_response("9", None, &token("AT", "RT", None));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["shop_id"], "9");
        assert!(json["connected_at"].is_string());
        assert!(json["last_updated"].is_string());
        assert!(json.get("access_token").is_none());
        assert!(json.get("refresh_token").is_none());
    }
}
