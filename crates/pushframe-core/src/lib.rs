//! Pushframe Delivery Engine
//!
//! Delivers encrypted, authenticated messages to browser/OS push endpoints
//! without a third-party push SDK. The caller hands the engine a recipient
//! and a notification; the engine resolves that recipient's push
//! subscriptions, signs a VAPID credential per push-service origin,
//! encrypts the payload per subscription, posts to each endpoint
//! concurrently, and prunes subscriptions the push service reports dead.
//!
//! ```text
//! caller
//!   │ deliver(recipient, notification)
//!   ▼
//! Dispatcher ── SubscriptionStore::list_by_recipient
//!   │
//!   ├─ per subscription (concurrent) ──────────────┐
//!   │    VAPID credential (pushframe-crypto)       │
//!   │    aesgcm encryption (pushframe-crypto)      │
//!   │    PushTransport::deliver → classify         │
//!   └────────────────────────────────────────────┘
//!   │
//!   ├─ SubscriptionStore::delete_by_ids(expired)
//!   ▼
//! DispatchSummary { sent, cleaned }
//! ```
//!
//! Push delivery is a best-effort side channel: per-subscription failures
//! are classified and logged, never raised to the caller. The only
//! whole-call failures are missing VAPID configuration (a soft "feature
//! disabled" result) and a store read error.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod dispatcher;
pub mod outcome;
pub mod payload;
pub mod store;
pub mod subscription;
pub mod transport;

pub use config::{ConfigError, vapid_from_env};
pub use dispatcher::{DispatchError, Dispatcher, MAX_CONCURRENT_DELIVERIES};
pub use outcome::{DeliveryOutcome, DispatchSummary, classify_status};
pub use payload::{Notification, NotificationPayload};
pub use store::{MemorySubscriptionStore, StoreError, SubscriptionStore};
pub use subscription::{PushSubscription, SubscriptionError};
pub use transport::{DEFAULT_TTL_SECS, HttpTransport, PushRequest, PushTransport, TransportError};
