//! Dispatch orchestration: the engine's single entry point.
//!
//! One [`Dispatcher::deliver`] call fans out to every subscription the
//! recipient has registered. Per-subscription work (VAPID signing,
//! encryption, the POST) runs concurrently with bounded parallelism; each
//! attempt resolves to a [`DeliveryOutcome`] and a fold over the joined
//! results produces the summary. There is no shared mutable state across
//! attempts and no retry logic - retry policy belongs to the caller.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use futures::StreamExt;
use futures::stream;
use thiserror::Error;
use tracing::{debug, info, warn};

use pushframe_crypto::{VapidKeyMaterial, authorization_header, seal_message};

use crate::outcome::{DeliveryOutcome, DispatchSummary, classify_status};
use crate::payload::Notification;
use crate::store::{StoreError, SubscriptionStore};
use crate::subscription::PushSubscription;
use crate::transport::{DEFAULT_TTL_SECS, PushRequest, PushTransport};

/// Upper bound on in-flight deliveries per dispatch call.
pub const MAX_CONCURRENT_DELIVERIES: usize = 16;

/// Whole-call dispatch failures.
///
/// Everything per-subscription is classified and logged instead; these are
/// the only errors a caller sees.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No VAPID key material configured. The soft "feature disabled"
    /// state - the Rust rendering of
    /// [`DeliveryOutcome::ConfigurationError`]. Callers treat it as
    /// "push unavailable", not a failure to alert on.
    #[error("push is not configured: no VAPID key material")]
    NotConfigured,

    /// The subscription store could not be read
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The notification payload could not be serialized
    #[error("payload serialization failed: {reason}")]
    Payload {
        /// Underlying serialization failure
        reason: String,
    },
}

/// The delivery engine.
///
/// Holds the process-wide VAPID key material (immutable, shared read-only
/// by every concurrent signing operation), the subscription store, and the
/// transport. Construct once at startup and share.
pub struct Dispatcher<S, T> {
    keys: Option<Arc<VapidKeyMaterial>>,
    store: S,
    transport: T,
    ttl_secs: u32,
}

impl<S, T> Dispatcher<S, T>
where
    S: SubscriptionStore,
    T: PushTransport,
{
    /// Build a dispatcher.
    ///
    /// `keys: None` constructs the engine in its disabled state: every
    /// dispatch returns [`DispatchError::NotConfigured`] without touching
    /// the store or the network.
    pub fn new(keys: Option<VapidKeyMaterial>, store: S, transport: T) -> Self {
        Self { keys: keys.map(Arc::new), store, transport, ttl_secs: DEFAULT_TTL_SECS }
    }

    /// Override the `TTL` header value for every delivery.
    pub fn with_ttl(mut self, ttl_secs: u32) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    /// Whether VAPID key material is loaded.
    pub fn is_configured(&self) -> bool {
        self.keys.is_some()
    }

    /// Deliver a notification to every subscription of a recipient.
    ///
    /// Zero subscriptions is a normal outcome (`sent: 0`). Expired
    /// subscriptions discovered during fan-out are deleted from the store
    /// in one batch after all sends complete.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::NotConfigured`]: no VAPID keys loaded; nothing
    ///   was attempted
    /// - [`DispatchError::Store`]: the subscription list could not be read
    /// - [`DispatchError::Payload`]: the notification could not be
    ///   serialized
    pub async fn deliver(
        &self,
        recipient_id: &str,
        notification: Notification,
    ) -> Result<DispatchSummary, DispatchError> {
        let Some(keys) = self.keys.as_ref() else {
            debug!(recipient_id, "push dispatch skipped: not configured");
            return Err(DispatchError::NotConfigured);
        };

        let subscriptions = self.store.list_by_recipient(recipient_id).await?;
        if subscriptions.is_empty() {
            debug!(recipient_id, "no push subscriptions");
            return Ok(DispatchSummary::default());
        }

        // Serialize once; every subscription encrypts identical plaintext.
        let body = notification
            .into_payload(unix_now_millis())
            .to_bytes()
            .map_err(|e| DispatchError::Payload { reason: e.to_string() })?;
        let now_unix = unix_now_secs();

        let total = subscriptions.len();
        let results: Vec<(String, DeliveryOutcome)> = stream::iter(subscriptions)
            .map(|subscription| {
                let body = body.clone();
                let keys = Arc::clone(keys);
                async move {
                    let outcome = self.deliver_one(&keys, &subscription, body, now_unix).await;
                    (subscription.id, outcome)
                }
            })
            .buffer_unordered(MAX_CONCURRENT_DELIVERIES)
            .collect()
            .await;

        let sent = results.iter().filter(|(_, outcome)| outcome.is_delivered()).count();
        let expired: Vec<String> = results
            .into_iter()
            .filter(|(_, outcome)| outcome.is_expired())
            .map(|(id, _)| id)
            .collect();

        let cleaned = if expired.is_empty() {
            0
        } else {
            match self.store.delete_by_ids(&expired).await {
                Ok(()) => {
                    info!(recipient_id, count = expired.len(), "removed expired push subscriptions");
                    expired.len()
                },
                Err(e) => {
                    // Left-behind dead subscriptions are re-classified and
                    // retried on the next dispatch.
                    warn!(recipient_id, error = %e, "failed to remove expired push subscriptions");
                    0
                },
            }
        };

        debug!(recipient_id, total, sent, cleaned, "push dispatch complete");
        Ok(DispatchSummary { sent, cleaned })
    }

    /// One subscription's delivery attempt, fully contained.
    ///
    /// Never returns an error: every failure mode collapses to a
    /// classified outcome so one bad subscription cannot affect the rest
    /// of the fan-out.
    async fn deliver_one(
        &self,
        keys: &VapidKeyMaterial,
        subscription: &PushSubscription,
        body: Vec<u8>,
        now_unix: u64,
    ) -> DeliveryOutcome {
        let authorization = match authorization_header(keys, &subscription.endpoint, now_unix) {
            Ok(header) => header,
            Err(e) => {
                warn!(subscription_id = %subscription.id, error = %e, "VAPID signing failed");
                return DeliveryOutcome::TransientFailure;
            },
        };

        let message = match seal_message(&body, &subscription.p256dh, &subscription.auth) {
            Ok(message) => message,
            Err(e) => {
                warn!(subscription_id = %subscription.id, error = %e, "payload encryption failed");
                return DeliveryOutcome::TransientFailure;
            },
        };

        let request = PushRequest {
            endpoint: subscription.endpoint.clone(),
            authorization,
            salt_b64: message.salt_b64(),
            dh_b64: message.sender_public_b64(),
            ttl_secs: self.ttl_secs,
            body: message.ciphertext,
        };

        match self.transport.deliver(request).await {
            Ok(status) => {
                let outcome = classify_status(status);
                match outcome {
                    DeliveryOutcome::Delivered => {
                        debug!(subscription_id = %subscription.id, status, "push delivered");
                    },
                    DeliveryOutcome::Expired => {
                        info!(subscription_id = %subscription.id, status, "push subscription expired");
                    },
                    _ => {
                        warn!(subscription_id = %subscription.id, status, "push service rejected message");
                    },
                }
                outcome
            },
            Err(e) => {
                warn!(subscription_id = %subscription.id, error = %e, "push request failed");
                DeliveryOutcome::TransientFailure
            },
        }
    }
}

fn unix_now_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs())
}

fn unix_now_millis() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_millis() as u64)
}
