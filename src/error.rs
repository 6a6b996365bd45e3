//! Error types for bridge configuration.
//!
//! Configuration problems are fatal: the bridge refuses to start without a
//! valid partner identity. All configuration constructors return
//! `Result<T, ConfigError>` so invalid values are rejected at the boundary.
//!
//! # Example
//!
//! ```rust
//! use shopee_bridge::{ConfigError, PartnerKey};
//!
//! let result = PartnerKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyPartnerKey)));
//! ```

use thiserror::Error;

/// Errors that can occur while building the bridge configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Partner ID is not a positive integer.
    #[error("Invalid partner ID '{value}'. Expected a positive integer issued by the Shopee Open Platform.")]
    InvalidPartnerId {
        /// The value that failed to parse.
        value: String,
    },

    /// Partner key cannot be empty.
    #[error("Partner key cannot be empty. Please provide the partner key issued by the Shopee Open Platform.")]
    EmptyPartnerKey,

    /// A URL setting is malformed.
    #[error("Invalid URL '{url}' for {field}. Please provide an absolute URL with scheme (e.g., 'https://partner.shopeemobile.com').")]
    InvalidUrl {
        /// The setting the URL was provided for.
        field: &'static str,
        /// The invalid URL that was provided.
        url: String,
    },

    /// The HTTP timeout setting is not a positive number of seconds.
    #[error("Invalid HTTP timeout '{value}'. Expected a positive number of seconds.")]
    InvalidTimeout {
        /// The value that failed to parse.
        value: String,
    },

    /// A required setting is missing.
    #[error("Missing required setting: '{field}'. Set {field} before starting the bridge.")]
    MissingRequiredField {
        /// The name of the missing setting.
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_partner_id_error_message() {
        let error = ConfigError::InvalidPartnerId {
            value: "abc".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("abc"));
        assert!(message.contains("positive integer"));
    }

    #[test]
    fn test_missing_required_field_names_the_setting() {
        let error = ConfigError::MissingRequiredField {
            field: "SHOPEE_PARTNER_KEY",
        };
        assert!(error.to_string().contains("SHOPEE_PARTNER_KEY"));
    }

    #[test]
    fn test_invalid_url_mentions_field() {
        let error = ConfigError::InvalidUrl {
            field: "base_url",
            url: "not a url".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("base_url"));
        assert!(message.contains("not a url"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::EmptyPartnerKey;
        let _: &dyn std::error::Error = &error;
    }
}
