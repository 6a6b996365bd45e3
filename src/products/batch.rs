//! Batch price and stock updates.
//!
//! Items are processed in input order. For each item the price call (if a
//! price is given) precedes the stock call (if a stock level is given), and
//! every call produces one [`BatchEntry`]. There is no atomicity: a failed
//! call does not undo earlier calls, and a malformed item is reported as an
//! error entry while the rest of the batch proceeds.

use serde::Serialize;
use serde_json::Value;

use crate::auth::ResolvedCredentials;
use crate::clients::PartnerClient;
use crate::products::error::ProductError;
use crate::products::update::{
    parse_item_id, parse_price, parse_stock, present, update_price, update_stock, PriceUpdate,
    StockUpdate,
};

/// One result of a batch update.
///
/// `item_id` echoes the value the caller sent.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchEntry {
    /// Response of a price call.
    Price {
        /// The item as sent.
        item_id: Value,
        /// The partner API response.
        price_update: Value,
    },
    /// Response of a stock call.
    Stock {
        /// The item as sent.
        item_id: Value,
        /// The partner API response.
        stock_update: Value,
    },
    /// The item was rejected before any call was made.
    Error {
        /// The item as sent, `null` if absent.
        item_id: Value,
        /// Why the item was rejected.
        error: String,
    },
}

impl BatchEntry {
    /// Returns `true` for [`BatchEntry::Error`].
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// The validated work for one batch item.
#[derive(Clone, Copy, Debug, PartialEq)]
struct BatchItem {
    price: Option<PriceUpdate>,
    stock: Option<StockUpdate>,
}

fn parse_batch_item(item: &Value) -> Result<BatchItem, ProductError> {
    let item_id = present(item, "item_id").ok_or(ProductError::MissingField { field: "item_id" })?;
    let item_id = parse_item_id(item_id)?;

    let price = present(item, "price")
        .map(parse_price)
        .transpose()?
        .map(|price| PriceUpdate { item_id, price });
    let stock = present(item, "stock")
        .map(parse_stock)
        .transpose()?
        .map(|stock| StockUpdate { item_id, stock });

    if price.is_none() && stock.is_none() {
        return Err(ProductError::NothingToUpdate);
    }

    Ok(BatchItem { price, stock })
}

/// Applies price and stock changes to several items.
///
/// # Errors
///
/// Returns [`ProductError::EmptyBatch`] if `items` is empty. Problems with
/// individual items are reported as [`BatchEntry::Error`] entries.
pub async fn batch_update(
    client: &PartnerClient,
    credentials: &ResolvedCredentials,
    items: &[Value],
) -> Result<Vec<BatchEntry>, ProductError> {
    if items.is_empty() {
        return Err(ProductError::EmptyBatch);
    }

    let mut results = Vec::with_capacity(items.len());
    for item in items {
        let item_id = item.get("item_id").cloned().unwrap_or(Value::Null);

        let work = match parse_batch_item(item) {
            Ok(work) => work,
            Err(error) => {
                tracing::warn!(item_id = %item_id, "Skipping batch item: {error}");
                results.push(BatchEntry::Error {
                    item_id,
                    error: error.to_string(),
                });
                continue;
            }
        };

        if let Some(update) = &work.price {
            results.push(BatchEntry::Price {
                item_id: item_id.clone(),
                price_update: update_price(client, credentials, update).await,
            });
        }
        if let Some(update) = &work.stock {
            results.push(BatchEntry::Stock {
                item_id: item_id.clone(),
                stock_update: update_stock(client, credentials, update).await,
            });
        }
    }

    tracing::info!(
        shop_id = %credentials.shop_id,
        items = items.len(),
        results = results.len(),
        "Batch update finished"
    );

    Ok(results)
}
