//! Single-item price and stock updates.
//!
//! Both mutations target the item's default model (`model_id` 0) and are
//! sent as authenticated calls with the resolved shop credentials.
//!
//! Numeric inputs may arrive as JSON numbers or as numeric strings, since
//! form-driven callers often send `"12"` rather than `12`.

use serde_json::{json, Value};

use crate::auth::ResolvedCredentials;
use crate::clients::{ApiRequest, PartnerClient};
use crate::products::error::ProductError;

/// Path of the price update endpoint.
pub const UPDATE_PRICE_PATH: &str = "/api/v2/product/update_price";

/// Path of the stock update endpoint.
pub const UPDATE_STOCK_PATH: &str = "/api/v2/product/update_stock";

/// Model ID addressing an item without variations.
pub const DEFAULT_MODEL_ID: u64 = 0;

/// A validated price change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceUpdate {
    /// The item to update.
    pub item_id: u64,
    /// The new original price.
    pub price: f64,
}

impl PriceUpdate {
    /// Reads `item_id` and `price` from a request body.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::MissingFields`] if either field is absent, or
    /// [`ProductError::InvalidField`] if either is malformed.
    pub fn from_json(body: &Value) -> Result<Self, ProductError> {
        let (Some(item_id), Some(price)) = (present(body, "item_id"), present(body, "price"))
        else {
            return Err(ProductError::MissingFields {
                fields: "item_id and price",
            });
        };

        Ok(Self {
            item_id: parse_item_id(item_id)?,
            price: parse_price(price)?,
        })
    }

    /// Returns the partner API request body.
    #[must_use]
    pub fn to_body(&self) -> Value {
        json!({
            "item_id": self.item_id,
            "price_list": [{
                "model_id": DEFAULT_MODEL_ID,
                "original_price": self.price,
            }],
        })
    }
}

/// A validated stock change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StockUpdate {
    /// The item to update.
    pub item_id: u64,
    /// The new normal stock level.
    pub stock: u64,
}

impl StockUpdate {
    /// Reads `item_id` and `stock` from a request body.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::MissingFields`] if either field is absent, or
    /// [`ProductError::InvalidField`] if either is malformed.
    pub fn from_json(body: &Value) -> Result<Self, ProductError> {
        let (Some(item_id), Some(stock)) = (present(body, "item_id"), present(body, "stock"))
        else {
            return Err(ProductError::MissingFields {
                fields: "item_id and stock",
            });
        };

        Ok(Self {
            item_id: parse_item_id(item_id)?,
            stock: parse_stock(stock)?,
        })
    }

    /// Returns the partner API request body.
    #[must_use]
    pub fn to_body(&self) -> Value {
        json!({
            "item_id": self.item_id,
            "stock_list": [{
                "model_id": DEFAULT_MODEL_ID,
                "normal_stock": self.stock,
            }],
        })
    }
}

/// Sets an item's price.
///
/// Returns the partner API response verbatim, or a structured error value
/// on transport failure.
pub async fn update_price(
    client: &PartnerClient,
    credentials: &ResolvedCredentials,
    update: &PriceUpdate,
) -> Value {
    tracing::debug!(shop_id = %credentials.shop_id, item_id = update.item_id, "Updating price");
    client
        .send(signed(UPDATE_PRICE_PATH, update.to_body(), credentials))
        .await
}

/// Sets an item's stock level.
///
/// Returns the partner API response verbatim, or a structured error value
/// on transport failure.
pub async fn update_stock(
    client: &PartnerClient,
    credentials: &ResolvedCredentials,
    update: &StockUpdate,
) -> Value {
    tracing::debug!(shop_id = %credentials.shop_id, item_id = update.item_id, "Updating stock");
    client
        .send(signed(UPDATE_STOCK_PATH, update.to_body(), credentials))
        .await
}

fn signed(path: &str, body: Value, credentials: &ResolvedCredentials) -> ApiRequest {
    ApiRequest::post(path, body)
        .with_shop_credentials(credentials.access_token.as_str(), credentials.shop_id.as_str())
}

/// Returns the field's value unless it is absent or null.
pub(crate) fn present<'a>(body: &'a Value, field: &str) -> Option<&'a Value> {
    body.get(field).filter(|v| !v.is_null())
}

pub(crate) fn parse_item_id(value: &Value) -> Result<u64, ProductError> {
    let invalid = || ProductError::InvalidField {
        field: "item_id",
        reason: format!("expected a positive integer, got {value}"),
    };

    let id = match value {
        Value::Number(n) => n.as_u64().ok_or_else(invalid)?,
        Value::String(s) => s.trim().parse::<u64>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };

    if id == 0 {
        return Err(invalid());
    }
    Ok(id)
}

pub(crate) fn parse_price(value: &Value) -> Result<f64, ProductError> {
    let invalid = || ProductError::InvalidField {
        field: "price",
        reason: format!("expected a non-negative number, got {value}"),
    };

    let price = match value {
        Value::Number(n) => n.as_f64().ok_or_else(invalid)?,
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };

    if !price.is_finite() || price < 0.0 {
        return Err(invalid());
    }
    Ok(price)
}

pub(crate) fn parse_stock(value: &Value) -> Result<u64, ProductError> {
    let invalid = || ProductError::InvalidField {
        field: "stock",
        reason: format!("expected a non-negative integer, got {value}"),
    };

    match value {
        Value::Number(n) => n.as_u64().ok_or_else(invalid),
        Value::String(s) => s.trim().parse::<u64>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_update_accepts_numbers_and_strings() {
        let update = PriceUpdate::from_json(&json!({"item_id": 1001, "price": 99.5})).unwrap();
        assert_eq!(update, PriceUpdate { item_id: 1001, price: 99.5 });

        let update = PriceUpdate::from_json(&json!({"item_id": "1001", "price": "12"})).unwrap();
        assert_eq!(update, PriceUpdate { item_id: 1001, price: 12.0 });
    }

    #[test]
    fn test_price_update_requires_both_fields() {
        let result = PriceUpdate::from_json(&json!({"item_id": 1}));
        assert_eq!(
            result,
            Err(ProductError::MissingFields {
                fields: "item_id and price"
            })
        );

        let result = PriceUpdate::from_json(&json!({"price": 1, "item_id": null}));
        assert!(matches!(result, Err(ProductError::MissingFields { .. })));
    }

    #[test]
    fn test_price_update_rejects_negative_and_non_numeric() {
        for body in [
            json!({"item_id": 1, "price": -1}),
            json!({"item_id": 1, "price": "cheap"}),
            json!({"item_id": 1, "price": "NaN"}),
            json!({"item_id": 1, "price": true}),
        ] {
            assert!(matches!(
                PriceUpdate::from_json(&body),
                Err(ProductError::InvalidField { field: "price", .. })
            ));
        }
    }

    #[test]
    fn test_price_body_shape() {
        let body = PriceUpdate { item_id: 7, price: 10.5 }.to_body();
        assert_eq!(
            body,
            json!({"item_id": 7, "price_list": [{"model_id": 0, "original_price": 10.5}]})
        );
    }

    #[test]
    fn test_stock_update_accepts_numbers_and_strings() {
        let update = StockUpdate::from_json(&json!({"item_id": 7, "stock": "25"})).unwrap();
        assert_eq!(update, StockUpdate { item_id: 7, stock: 25 });

        let update = StockUpdate::from_json(&json!({"item_id": 7, "stock": 0})).unwrap();
        assert_eq!(update.stock, 0);
    }

    #[test]
    fn test_stock_update_rejects_negative_and_fractional() {
        for body in [
            json!({"item_id": 7, "stock": -3}),
            json!({"item_id": 7, "stock": 2.5}),
            json!({"item_id": 7, "stock": "many"}),
        ] {
            assert!(matches!(
                StockUpdate::from_json(&body),
                Err(ProductError::InvalidField { field: "stock", .. })
            ));
        }
    }

    #[test]
    fn test_stock_body_shape() {
        let body = StockUpdate { item_id: 7, stock: 3 }.to_body();
        assert_eq!(
            body,
            json!({"item_id": 7, "stock_list": [{"model_id": 0, "normal_stock": 3}]})
        );
    }

    #[test]
    fn test_item_id_must_be_positive_integer() {
        assert!(parse_item_id(&json!(0)).is_err());
        assert!(parse_item_id(&json!(-5)).is_err());
        assert!(parse_item_id(&json!("abc")).is_err());
        assert!(parse_item_id(&json!(1.5)).is_err());
        assert_eq!(parse_item_id(&json!(" 42 ")), Ok(42));
    }
}
