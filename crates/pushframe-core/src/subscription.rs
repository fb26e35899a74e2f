//! Push subscription records.
//!
//! A subscription is created by the client device when it registers for
//! push and is read-only to this engine; the engine's only write is the
//! batched deletion of subscriptions a push service reports dead.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use pushframe_crypto::{AUTH_SECRET_SIZE, PUBLIC_KEY_SIZE, b64};

/// One device's push registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushSubscription {
    /// Opaque identifier owned by the subscription store
    pub id: String,
    /// Push service URL that relays messages to the device
    pub endpoint: String,
    /// Device's P-256 public key for ECDH (URL-safe base64, 65 bytes raw)
    pub p256dh: String,
    /// Device-chosen 16-byte auth secret (URL-safe base64)
    pub auth: String,
}

/// Validation failures for subscription fields.
#[derive(Debug, Error)]
pub enum SubscriptionError {
    /// Endpoint is not an HTTPS URL
    #[error("invalid endpoint: {reason}")]
    InvalidEndpoint {
        /// Why the endpoint was rejected
        reason: String,
    },

    /// `p256dh` is not a 65-byte uncompressed P-256 point
    #[error("invalid p256dh key: {reason}")]
    InvalidClientKey {
        /// Why the key was rejected
        reason: String,
    },

    /// `auth` is not a 16-byte secret
    #[error("invalid auth secret: {reason}")]
    InvalidAuthSecret {
        /// Why the secret was rejected
        reason: String,
    },
}

impl PushSubscription {
    /// Check the structural invariants a registration must satisfy.
    ///
    /// Stores call this before persisting a subscription so the dispatch
    /// path only ever sees decodable key material. The checks are shape
    /// checks; whether the point is actually on the curve is decided at
    /// encryption time.
    ///
    /// # Errors
    ///
    /// One of the [`SubscriptionError`] variants naming the bad field.
    pub fn validate(&self) -> Result<(), SubscriptionError> {
        let url = Url::parse(&self.endpoint).map_err(|e| SubscriptionError::InvalidEndpoint {
            reason: format!("not a URL: {e}"),
        })?;
        if url.scheme() != "https" {
            return Err(SubscriptionError::InvalidEndpoint {
                reason: "push endpoints must use https".to_string(),
            });
        }

        let key = b64::decode(&self.p256dh).map_err(|e| SubscriptionError::InvalidClientKey {
            reason: format!("not valid base64: {e}"),
        })?;
        if key.len() != PUBLIC_KEY_SIZE {
            return Err(SubscriptionError::InvalidClientKey {
                reason: format!("expected {PUBLIC_KEY_SIZE} bytes, got {}", key.len()),
            });
        }
        if key[0] != 0x04 {
            return Err(SubscriptionError::InvalidClientKey {
                reason: "missing uncompressed point prefix 0x04".to_string(),
            });
        }

        let auth = b64::decode(&self.auth).map_err(|e| SubscriptionError::InvalidAuthSecret {
            reason: format!("not valid base64: {e}"),
        })?;
        if auth.len() != AUTH_SECRET_SIZE {
            return Err(SubscriptionError::InvalidAuthSecret {
                reason: format!("expected {AUTH_SECRET_SIZE} bytes, got {}", auth.len()),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_subscription() -> PushSubscription {
        let mut key = vec![0x04u8];
        key.extend_from_slice(&[0xAA; 64]);

        PushSubscription {
            id: "sub-1".to_string(),
            endpoint: "https://push.example.com/send/abc".to_string(),
            p256dh: b64::encode(&key),
            auth: b64::encode(&[0xCC; 16]),
        }
    }

    #[test]
    fn valid_subscription_passes() {
        assert!(valid_subscription().validate().is_ok());
    }

    #[test]
    fn rejects_http_endpoint() {
        let mut sub = valid_subscription();
        sub.endpoint = "http://push.example.com/send/abc".to_string();

        assert!(matches!(sub.validate(), Err(SubscriptionError::InvalidEndpoint { .. })));
    }

    #[test]
    fn rejects_unparseable_endpoint() {
        let mut sub = valid_subscription();
        sub.endpoint = "not a url".to_string();

        assert!(matches!(sub.validate(), Err(SubscriptionError::InvalidEndpoint { .. })));
    }

    #[test]
    fn rejects_short_client_key() {
        let mut sub = valid_subscription();
        sub.p256dh = b64::encode(&[0xAA; 32]);

        assert!(matches!(
            sub.validate(),
            Err(SubscriptionError::InvalidClientKey { reason }) if reason.contains("65 bytes")
        ));
    }

    #[test]
    fn rejects_compressed_point_prefix() {
        let mut sub = valid_subscription();
        let mut key = vec![0x03u8];
        key.extend_from_slice(&[0xAA; 64]);
        sub.p256dh = b64::encode(&key);

        assert!(matches!(
            sub.validate(),
            Err(SubscriptionError::InvalidClientKey { reason }) if reason.contains("0x04")
        ));
    }

    #[test]
    fn rejects_wrong_auth_length() {
        let mut sub = valid_subscription();
        sub.auth = b64::encode(&[0xCC; 8]);

        assert!(matches!(sub.validate(), Err(SubscriptionError::InvalidAuthSecret { .. })));
    }

    #[test]
    fn rejects_non_base64_fields() {
        let mut sub = valid_subscription();
        sub.p256dh = "!!!".to_string();
        assert!(matches!(sub.validate(), Err(SubscriptionError::InvalidClientKey { .. })));

        let mut sub = valid_subscription();
        sub.auth = "!!!".to_string();
        assert!(matches!(sub.validate(), Err(SubscriptionError::InvalidAuthSecret { .. })));
    }
}
