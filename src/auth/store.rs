//! Token storage for connected shops.
//!
//! The [`TokenStore`] trait is the seam between the authorization flow and
//! wherever credentials live. The bridge ships [`InMemoryTokenStore`]; a
//! persistent backend only needs to implement the same four operations.
//!
//! # Example
//!
//! ```rust
//! use shopee_bridge::auth::{CredentialRecord, InMemoryTokenStore, TokenResponse, TokenStore};
//!
//! let store = InMemoryTokenStore::new();
//! let token = TokenResponse {
//!     access_token: "AT".to_string(),
//!     refresh_token: "RT".to_string(),
//!     expire_in: Some(3600),
//!     request_id: None,
//! };
//!
//! store.put(CredentialRecord::from_token_response("9", None, &token));
//! assert_eq!(store.get("9").unwrap().access_token, "AT");
//! assert!(store.get("10").is_none());
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::auth::credential::{CredentialRecord, TokenResponse};

/// Storage for per-shop credential records.
///
/// Implementations must make each operation atomic with respect to the
/// others: a reader never observes a partially written record.
pub trait TokenStore: Send + Sync {
    /// Inserts or fully replaces the record for `record.shop_id`.
    fn put(&self, record: CredentialRecord);

    /// Returns the record for a shop, or `None` if the shop is not connected.
    fn get(&self, shop_id: &str) -> Option<CredentialRecord>;

    /// Returns every record currently held.
    fn list_all(&self) -> Vec<CredentialRecord>;

    /// Applies refreshed tokens to an existing record.
    ///
    /// Returns the updated record, or `None` if the shop is not connected.
    fn update_tokens(
        &self,
        shop_id: &str,
        token: &TokenResponse,
        at: DateTime<Utc>,
    ) -> Option<CredentialRecord>;
}

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<String, CredentialRecord>,
    // Shop IDs in first-insertion order
    order: Vec<String>,
}

/// Process-lifetime token store guarded by a single lock.
///
/// Records are lost when the process exits. `list_all` returns records in
/// the order shops were first connected.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    inner: RwLock<Inner>,
}

impl InMemoryTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of connected shops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    /// Returns `true` if no shop is connected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().records.is_empty()
    }
}

impl TokenStore for InMemoryTokenStore {
    fn put(&self, record: CredentialRecord) {
        let mut inner = self.inner.write();
        if !inner.records.contains_key(&record.shop_id) {
            inner.order.push(record.shop_id.clone());
        }
        inner.records.insert(record.shop_id.clone(), record);
    }

    fn get(&self, shop_id: &str) -> Option<CredentialRecord> {
        self.inner.read().records.get(shop_id).cloned()
    }

    fn list_all(&self) -> Vec<CredentialRecord> {
        let inner = self.inner.read();
        inner
            .order
            .iter()
            .filter_map(|shop_id| inner.records.get(shop_id).cloned())
            .collect()
    }

    fn update_tokens(
        &self,
        shop_id: &str,
        token: &TokenResponse,
        at: DateTime<Utc>,
    ) -> Option<CredentialRecord> {
        let mut inner = self.inner.write();
        let record = inner.records.get_mut(shop_id)?;
        record.apply_refresh(token, at);
        Some(record.clone())
    }
}

// Verify InMemoryTokenStore is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<InMemoryTokenStore>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn token(access: &str, refresh: &str) -> TokenResponse {
        TokenResponse {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
            expire_in: Some(3600),
            request_id: None,
        }
    }

    fn record(shop_id: &str, access: &str) -> CredentialRecord {
        CredentialRecord::from_token_response(shop_id, None, &token(access, "RT"))
    }

    #[test]
    fn test_put_then_get_returns_exact_record() {
        let store = InMemoryTokenStore::new();
        let written = record("9", "AT");

        store.put(written.clone());

        assert_eq!(store.get("9"), Some(written));
    }

    #[test]
    fn test_get_missing_shop_returns_none() {
        let store = InMemoryTokenStore::new();
        assert!(store.get("missing").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_put_replaces_prior_record() {
        let store = InMemoryTokenStore::new();
        store.put(record("9", "old-token"));
        store.put(record("9", "new-token"));

        assert_eq!(store.len(), 1);
        let current = store.get("9").unwrap();
        assert_eq!(current.access_token, "new-token");
        assert!(store
            .list_all()
            .iter()
            .all(|r| r.access_token != "old-token"));
    }

    #[test]
    fn test_list_all_keeps_first_insertion_order() {
        let store = InMemoryTokenStore::new();
        store.put(record("3", "a"));
        store.put(record("1", "b"));
        store.put(record("2", "c"));
        store.put(record("3", "d"));

        let ids: Vec<String> = store.list_all().into_iter().map(|r| r.shop_id).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_update_tokens_mutates_existing_record() {
        let store = InMemoryTokenStore::new();
        let original = record("9", "AT");
        store.put(original.clone());
        let at = Utc::now();

        let updated = store.update_tokens("9", &token("AT2", "RT2"), at).unwrap();

        assert_eq!(updated.access_token, "AT2");
        assert_eq!(updated.refresh_token, "RT2");
        assert_eq!(updated.connected_at, original.connected_at);
        assert_eq!(updated.last_updated, at);
        assert_eq!(store.get("9"), Some(updated));
    }

    #[test]
    fn test_update_tokens_for_unknown_shop_is_none() {
        let store = InMemoryTokenStore::new();
        assert!(store.update_tokens("9", &token("AT", "RT"), Utc::now()).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_concurrent_writers_never_tear_records() {
        let store = Arc::new(InMemoryTokenStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for n in 0..200 {
                        let value = format!("{i}-{n}");
                        let mut rec = record("9", &value);
                        rec.refresh_token.clone_from(&value);
                        store.put(rec);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let current = store.get("9").unwrap();
        assert_eq!(current.access_token, current.refresh_token);
        assert_eq!(store.len(), 1);
    }
}
