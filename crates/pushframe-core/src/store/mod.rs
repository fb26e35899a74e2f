//! Subscription store abstraction.
//!
//! The engine needs exactly two operations against whatever persists push
//! subscriptions: read a recipient's subscriptions and batch-delete dead
//! ones. Implementations wrap the application's database; the in-memory
//! implementation backs tests, simulation, and one-shot tooling.

mod memory;

use async_trait::async_trait;
pub use memory::MemorySubscriptionStore;
use thiserror::Error;

use crate::subscription::PushSubscription;

/// Errors from the backing subscription storage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store failed (connection loss, query failure)
    #[error("subscription store error: {reason}")]
    Backend {
        /// Backend-specific failure description
        reason: String,
    },
}

/// Read/delete access to persisted push subscriptions.
///
/// Must be `Send + Sync` - the dispatcher is shared across concurrent
/// dispatch calls. Reads happen before fan-out; the only write is the
/// batched cleanup after fan-out completes, so implementations need no
/// ordering guarantees beyond their own internal consistency.
#[async_trait]
pub trait SubscriptionStore: Send + Sync + 'static {
    /// All push subscriptions registered for a recipient.
    ///
    /// An unknown recipient yields an empty vector, not an error; having
    /// no subscriptions is the normal state for most recipients.
    async fn list_by_recipient(
        &self,
        recipient_id: &str,
    ) -> Result<Vec<PushSubscription>, StoreError>;

    /// Delete subscriptions by id in one batch.
    ///
    /// Ids that no longer exist are skipped silently; cleanup races with
    /// client-initiated unsubscription.
    async fn delete_by_ids(&self, ids: &[String]) -> Result<(), StoreError>;
}
