#![allow(clippy::disallowed_types, reason = "Synchronous in-memory operations only")]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;

use super::{StoreError, SubscriptionStore};
use crate::subscription::{PushSubscription, SubscriptionError};

/// In-memory subscription store for testing and one-shot tooling.
///
/// Uses a `HashMap` keyed by recipient id. All state is wrapped in
/// Arc<Mutex<>> to allow Clone and concurrent access. Thread-safe through
/// Mutex, but uses `lock().expect()` which will panic if the mutex is
/// poisoned - acceptable for test code. The lock is never held across an
/// await point.
#[derive(Clone, Default)]
pub struct MemorySubscriptionStore {
    inner: Arc<Mutex<HashMap<String, Vec<PushSubscription>>>>,
}

impl MemorySubscriptionStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscription for a recipient after validating it.
    ///
    /// # Errors
    ///
    /// [`SubscriptionError`] if a field fails validation.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned (a thread panicked while
    /// holding the lock). This is acceptable for test/simulation code.
    #[allow(clippy::expect_used)]
    pub fn insert(
        &self,
        recipient_id: impl Into<String>,
        subscription: PushSubscription,
    ) -> Result<(), SubscriptionError> {
        subscription.validate()?;
        self.inner
            .lock()
            .expect("Mutex poisoned")
            .entry(recipient_id.into())
            .or_default()
            .push(subscription);
        Ok(())
    }

    /// Total number of stored subscriptions across all recipients.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. This is acceptable for
    /// test code.
    #[allow(clippy::expect_used)]
    pub fn subscription_count(&self) -> usize {
        self.inner.lock().expect("Mutex poisoned").values().map(Vec::len).sum()
    }

    /// Whether a subscription with the given id exists for any recipient.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. This is acceptable for
    /// test code.
    #[allow(clippy::expect_used)]
    pub fn contains(&self, id: &str) -> bool {
        self.inner
            .lock()
            .expect("Mutex poisoned")
            .values()
            .any(|subs| subs.iter().any(|sub| sub.id == id))
    }
}

#[async_trait]
impl SubscriptionStore for MemorySubscriptionStore {
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. This is acceptable for
    /// test code.
    #[allow(clippy::expect_used)]
    async fn list_by_recipient(
        &self,
        recipient_id: &str,
    ) -> Result<Vec<PushSubscription>, StoreError> {
        Ok(self
            .inner
            .lock()
            .expect("Mutex poisoned")
            .get(recipient_id)
            .cloned()
            .unwrap_or_default())
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. This is acceptable for
    /// test code.
    #[allow(clippy::expect_used)]
    async fn delete_by_ids(&self, ids: &[String]) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("Mutex poisoned");
        for subs in inner.values_mut() {
            subs.retain(|sub| !ids.contains(&sub.id));
        }
        inner.retain(|_, subs| !subs.is_empty());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pushframe_crypto::b64;

    use super::*;

    fn subscription(id: &str) -> PushSubscription {
        let mut key = vec![0x04u8];
        key.extend_from_slice(&[0xAA; 64]);

        PushSubscription {
            id: id.to_string(),
            endpoint: format!("https://push.example.com/send/{id}"),
            p256dh: b64::encode(&key),
            auth: b64::encode(&[0xCC; 16]),
        }
    }

    #[tokio::test]
    async fn new_store_is_empty() {
        let store = MemorySubscriptionStore::new();
        assert_eq!(store.subscription_count(), 0);
        assert!(store.list_by_recipient("user-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_and_list() {
        let store = MemorySubscriptionStore::new();
        store.insert("user-1", subscription("a")).unwrap();
        store.insert("user-1", subscription("b")).unwrap();
        store.insert("user-2", subscription("c")).unwrap();

        let subs = store.list_by_recipient("user-1").await.unwrap();
        assert_eq!(subs.len(), 2);
        assert_eq!(store.subscription_count(), 3);
    }

    #[tokio::test]
    async fn insert_validates() {
        let store = MemorySubscriptionStore::new();
        let mut bad = subscription("a");
        bad.auth = b64::encode(&[0u8; 4]);

        assert!(store.insert("user-1", bad).is_err());
        assert_eq!(store.subscription_count(), 0);
    }

    #[tokio::test]
    async fn delete_by_ids_removes_only_named() {
        let store = MemorySubscriptionStore::new();
        store.insert("user-1", subscription("a")).unwrap();
        store.insert("user-1", subscription("b")).unwrap();
        store.insert("user-2", subscription("c")).unwrap();

        store
            .delete_by_ids(&["a".to_string(), "c".to_string()])
            .await
            .unwrap();

        assert!(!store.contains("a"));
        assert!(store.contains("b"));
        assert!(!store.contains("c"));
    }

    #[tokio::test]
    async fn delete_unknown_ids_is_a_noop() {
        let store = MemorySubscriptionStore::new();
        store.insert("user-1", subscription("a")).unwrap();

        store.delete_by_ids(&["zzz".to_string()]).await.unwrap();

        assert!(store.contains("a"));
    }
}
