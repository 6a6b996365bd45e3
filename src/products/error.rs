//! Validation errors for product mutations.

use thiserror::Error;

/// Error type for product mutation input.
///
/// These are raised before any partner API call is made. Failures reported
/// by the partner API itself are relayed in the response value instead.
///
/// # Example
///
/// ```rust
/// use shopee_bridge::products::ProductError;
///
/// let error = ProductError::MissingFields { fields: "item_id and price" };
/// assert_eq!(error.to_string(), "item_id and price are required");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProductError {
    /// One or more required fields are absent.
    #[error("{fields} are required")]
    MissingFields {
        /// The required fields, as shown to the caller.
        fields: &'static str,
    },

    /// A single required field is absent.
    #[error("{field} is required")]
    MissingField {
        /// The required field.
        field: &'static str,
    },

    /// A field is present but does not hold an acceptable value.
    #[error("Invalid {field}: {reason}")]
    InvalidField {
        /// The offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A batch item carries neither `price` nor `stock`.
    #[error("nothing to update: item has neither price nor stock")]
    NothingToUpdate,

    /// A batch request carried no items.
    #[error("items array is required")]
    EmptyBatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_field_message() {
        let error = ProductError::InvalidField {
            field: "stock",
            reason: "must be a non-negative integer".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid stock: must be a non-negative integer");
    }

    #[test]
    fn test_empty_batch_message() {
        assert_eq!(ProductError::EmptyBatch.to_string(), "items array is required");
    }
}
