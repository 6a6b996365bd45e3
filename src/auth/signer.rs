//! HMAC-SHA256 request signing for the Shopee partner API.
//!
//! Every partner API call carries a `sign` query parameter: the lowercase hex
//! HMAC-SHA256 of a base string, keyed by the partner key. The platform
//! recomputes the same base string to verify the call.
//!
//! # Base strings
//!
//! | Mode | Base string |
//! |------|-------------|
//! | Unauthenticated | `partner_id` + `api_path` + `timestamp` |
//! | Authenticated | `partner_id` + `api_path` + `timestamp` + `access_token` + `shop_id` |
//!
//! Fields are concatenated without delimiters.
//!
//! # Example
//!
//! ```rust
//! use shopee_bridge::auth::{SignatureRequest, Signer};
//! use shopee_bridge::{PartnerId, PartnerKey};
//!
//! let partner_id = PartnerId::new(123).unwrap();
//! let signer = Signer::new(partner_id, PartnerKey::new("secret").unwrap());
//!
//! let request = SignatureRequest::unauthenticated(partner_id, "/api/v2/shop/auth_partner", 1000);
//! assert_eq!(request.base_string(), "123/api/v2/shop/auth_partner1000");
//!
//! let sign = signer.sign(&request);
//! assert_eq!(sign.len(), 64);
//! ```

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::config::{PartnerId, PartnerKey};

type HmacSha256 = Hmac<Sha256>;

/// Computes an HMAC-SHA256 signature for the given message.
///
/// The signature is returned as a lowercase hexadecimal string.
///
/// # Example
///
/// ```rust
/// use shopee_bridge::auth::compute_signature;
///
/// let sig = compute_signature("test-message", "secret-key");
/// assert_eq!(sig.len(), 64);
/// ```
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
pub fn compute_signature(message: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// The inputs of one request signature.
///
/// The two variants make the signing contract explicit: a request is either
/// signed for the partner alone or for the partner acting on one shop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureRequest<'a> {
    /// Partner-level call (authorization URL, token exchange, token refresh).
    Unauthenticated {
        /// The partner the call is made for.
        partner_id: PartnerId,
        /// The request path, exactly as sent.
        path: &'a str,
        /// Unix timestamp in seconds, exactly as sent.
        timestamp: i64,
    },
    /// Shop-level call made with a shop's access token.
    Authenticated {
        /// The partner the call is made for.
        partner_id: PartnerId,
        /// The request path, exactly as sent.
        path: &'a str,
        /// Unix timestamp in seconds, exactly as sent.
        timestamp: i64,
        /// The shop's access token.
        access_token: &'a str,
        /// The shop ID.
        shop_id: &'a str,
    },
}

impl<'a> SignatureRequest<'a> {
    /// Creates a partner-level signature request.
    #[must_use]
    pub const fn unauthenticated(partner_id: PartnerId, path: &'a str, timestamp: i64) -> Self {
        Self::Unauthenticated {
            partner_id,
            path,
            timestamp,
        }
    }

    /// Creates a shop-level signature request.
    #[must_use]
    pub const fn authenticated(
        partner_id: PartnerId,
        path: &'a str,
        timestamp: i64,
        access_token: &'a str,
        shop_id: &'a str,
    ) -> Self {
        Self::Authenticated {
            partner_id,
            path,
            timestamp,
            access_token,
            shop_id,
        }
    }

    /// Creates a signature request from an optional token and shop ID.
    ///
    /// Only a non-empty token together with a non-empty shop ID selects the
    /// authenticated variant. Any other combination, including just one of
    /// the two, signs as unauthenticated without warning.
    #[must_use]
    pub fn from_parts(
        partner_id: PartnerId,
        path: &'a str,
        timestamp: i64,
        access_token: Option<&'a str>,
        shop_id: Option<&'a str>,
    ) -> Self {
        match (
            access_token.filter(|t| !t.is_empty()),
            shop_id.filter(|s| !s.is_empty()),
        ) {
            (Some(access_token), Some(shop_id)) => {
                Self::authenticated(partner_id, path, timestamp, access_token, shop_id)
            }
            _ => Self::unauthenticated(partner_id, path, timestamp),
        }
    }

    /// Returns `true` for the shop-level variant.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Returns the exact string that gets signed.
    #[must_use]
    pub fn base_string(&self) -> String {
        match self {
            Self::Unauthenticated {
                partner_id,
                path,
                timestamp,
            } => format!("{partner_id}{path}{timestamp}"),
            Self::Authenticated {
                partner_id,
                path,
                timestamp,
                access_token,
                shop_id,
            } => format!("{partner_id}{path}{timestamp}{access_token}{shop_id}"),
        }
    }
}

/// Signs partner API requests with the partner key.
///
/// The signer is a pure function of its inputs: identical requests always
/// produce identical signatures. Its `Debug` output never includes the key.
#[derive(Clone, Debug)]
pub struct Signer {
    partner_id: PartnerId,
    partner_key: PartnerKey,
}

// Verify Signer is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Signer>();
};

impl Signer {
    /// Creates a signer for the given partner identity.
    #[must_use]
    pub const fn new(partner_id: PartnerId, partner_key: PartnerKey) -> Self {
        Self {
            partner_id,
            partner_key,
        }
    }

    /// Returns the partner ID this signer signs for.
    #[must_use]
    pub const fn partner_id(&self) -> PartnerId {
        self.partner_id
    }

    /// Returns the lowercase hex signature of the request.
    #[must_use]
    pub fn sign(&self, request: &SignatureRequest<'_>) -> String {
        compute_signature(&request.base_string(), self.partner_key.as_ref())
    }

    /// Signs a call for this signer's partner, falling back to
    /// unauthenticated mode as described in [`SignatureRequest::from_parts`].
    #[must_use]
    pub fn sign_parts(
        &self,
        path: &str,
        timestamp: i64,
        access_token: Option<&str>,
        shop_id: Option<&str>,
    ) -> String {
        self.sign(&SignatureRequest::from_parts(
            self.partner_id,
            path,
            timestamp,
            access_token,
            shop_id,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTH_PARTNER_PATH: &str = "/api/v2/shop/auth_partner";

    fn partner() -> PartnerId {
        PartnerId::new(123).unwrap()
    }

    fn signer() -> Signer {
        Signer::new(partner(), PartnerKey::new("partner-secret").unwrap())
    }

    #[test]
    fn test_compute_signature_produces_lowercase_hex() {
        let sig = compute_signature("test", "secret");

        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(sig.chars().all(|c| !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_compute_signature_matches_known_value() {
        // HMAC-SHA256("message", "key")
        let sig = compute_signature("message", "key");
        assert_eq!(
            sig,
            "6e9ef29b75fffc5b7abae527d58fdadb2fe42e7219011976917343065f58ed4a"
        );
    }

    #[test]
    fn test_unauthenticated_base_string() {
        let request = SignatureRequest::unauthenticated(partner(), AUTH_PARTNER_PATH, 1000);
        assert_eq!(request.base_string(), "123/api/v2/shop/auth_partner1000");
        assert!(!request.is_authenticated());
    }

    #[test]
    fn test_authenticated_base_string() {
        let request =
            SignatureRequest::authenticated(partner(), "/api/v2/product/update_price", 1000, "tok", "9");
        assert_eq!(
            request.base_string(),
            "123/api/v2/product/update_price1000tok9"
        );
        assert!(request.is_authenticated());
    }

    #[test]
    fn test_sign_is_hmac_of_base_string() {
        let request = SignatureRequest::unauthenticated(partner(), AUTH_PARTNER_PATH, 1000);
        assert_eq!(
            signer().sign(&request),
            compute_signature("123/api/v2/shop/auth_partner1000", "partner-secret")
        );
    }

    #[test]
    fn test_authenticated_signature_differs_from_unauthenticated() {
        let d1 = signer().sign_parts(AUTH_PARTNER_PATH, 1000, None, None);
        let d2 = signer().sign_parts(AUTH_PARTNER_PATH, 1000, Some("tok"), Some("9"));
        assert_ne!(d1, d2);
    }

    #[test]
    fn test_same_request_signs_identically() {
        let first = signer().sign_parts(AUTH_PARTNER_PATH, 1000, Some("tok"), Some("9"));
        let second = signer().sign_parts(AUTH_PARTNER_PATH, 1000, Some("tok"), Some("9"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_changing_any_input_changes_the_digest() {
        let path = "/api/v2/product/update_price";
        let base = signer().sign_parts(path, 1000, None, None);

        assert_ne!(signer().sign_parts(path, 1001, None, None), base);
        assert_ne!(
            signer().sign_parts("/api/v2/product/update_stock", 1000, None, None),
            base
        );

        let other_partner = Signer::new(
            PartnerId::new(124).unwrap(),
            PartnerKey::new("partner-secret").unwrap(),
        );
        assert_ne!(other_partner.sign_parts(path, 1000, None, None), base);

        let other_key = Signer::new(partner(), PartnerKey::new("other-secret").unwrap());
        assert_ne!(other_key.sign_parts(path, 1000, None, None), base);

        let authenticated = signer().sign_parts(path, 1000, Some("tok"), Some("9"));
        assert_ne!(signer().sign_parts(path, 1001, Some("tok"), Some("9")), authenticated);
        assert_ne!(signer().sign_parts(path, 1000, Some("tok2"), Some("9")), authenticated);
        assert_ne!(signer().sign_parts(path, 1000, Some("tok"), Some("10")), authenticated);
    }

    #[test]
    fn test_single_credential_falls_back_to_unauthenticated() {
        let neither = signer().sign_parts(AUTH_PARTNER_PATH, 1000, None, None);
        let token_only = signer().sign_parts(AUTH_PARTNER_PATH, 1000, Some("tok"), None);
        let shop_only = signer().sign_parts(AUTH_PARTNER_PATH, 1000, None, Some("9"));
        let empty_token = signer().sign_parts(AUTH_PARTNER_PATH, 1000, Some(""), Some("9"));

        assert_eq!(token_only, neither);
        assert_eq!(shop_only, neither);
        assert_eq!(empty_token, neither);
    }

    #[test]
    fn test_from_parts_selects_variant() {
        assert!(
            SignatureRequest::from_parts(partner(), "/p", 1, Some("t"), Some("s")).is_authenticated()
        );
        assert!(!SignatureRequest::from_parts(partner(), "/p", 1, Some("t"), None).is_authenticated());
    }

    #[test]
    fn test_signer_debug_hides_partner_key() {
        let debug_output = format!("{:?}", signer());
        assert!(!debug_output.contains("partner-secret"));
        assert!(debug_output.contains("PartnerKey(*****)"));
    }
}
