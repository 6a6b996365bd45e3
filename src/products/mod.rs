//! Product price and stock mutations.
//!
//! - [`update_price`] and [`update_stock`]: One signed call each
//! - [`batch_update`]: Several items, one call per field per item
//!
//! All calls carry the shop credentials from
//! [`resolve_credentials`](crate::auth::resolve_credentials). Partner API
//! responses are returned as they arrive, so a rejected update shows up as a
//! response with an `error` field rather than as a Rust error.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopee_bridge::products::{update_stock, StockUpdate};
//! use serde_json::json;
//!
//! let update = StockUpdate::from_json(&json!({"item_id": 1001, "stock": "25"}))?;
//! let response = update_stock(&client, &credentials, &update).await;
//! ```

mod batch;
mod error;
mod update;

pub use batch::{batch_update, BatchEntry};
pub use error::ProductError;
pub use update::{
    update_price, update_stock, PriceUpdate, StockUpdate, DEFAULT_MODEL_ID, UPDATE_PRICE_PATH,
    UPDATE_STOCK_PATH,
};
