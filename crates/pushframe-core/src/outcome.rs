//! Delivery outcome classification.
//!
//! Every per-subscription attempt collapses to one of four outcomes; the
//! dispatcher folds them into a [`DispatchSummary`] and the caller never
//! sees per-subscription detail (failures are logged, not surfaced).

/// Classified result of one delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Push service accepted the message (2xx)
    Delivered,
    /// Device unsubscribed; the subscription is dead and eligible for
    /// cleanup (404 or 410)
    Expired,
    /// Network failure, non-2xx/404/410 status, or a per-subscription
    /// crypto failure; no state change, caller may retry a later dispatch
    TransientFailure,
    /// No VAPID key material configured; short-circuits the whole
    /// dispatch before any per-subscription work
    ConfigurationError,
}

impl DeliveryOutcome {
    /// Whether the push service accepted the message.
    pub fn is_delivered(self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// Whether the subscription should be removed from the store.
    pub fn is_expired(self) -> bool {
        matches!(self, Self::Expired)
    }
}

/// Map an HTTP status from a push service to an outcome.
///
/// 404 and 410 both mean the endpoint no longer accepts messages; push
/// services are inconsistent about which they return for an expired
/// registration, so both trigger cleanup.
pub fn classify_status(status: u16) -> DeliveryOutcome {
    match status {
        200..=299 => DeliveryOutcome::Delivered,
        404 | 410 => DeliveryOutcome::Expired,
        _ => DeliveryOutcome::TransientFailure,
    }
}

/// Aggregate result of one dispatch call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Subscriptions the push service accepted the message for
    pub sent: usize,
    /// Dead subscriptions removed from the store
    pub cleaned: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_completeness() {
        // The full table from the delivery contract
        assert_eq!(classify_status(200), DeliveryOutcome::Delivered);
        assert_eq!(classify_status(201), DeliveryOutcome::Delivered);
        assert_eq!(classify_status(404), DeliveryOutcome::Expired);
        assert_eq!(classify_status(410), DeliveryOutcome::Expired);
        assert_eq!(classify_status(500), DeliveryOutcome::TransientFailure);
    }

    #[test]
    fn client_errors_other_than_gone_are_transient() {
        assert_eq!(classify_status(400), DeliveryOutcome::TransientFailure);
        assert_eq!(classify_status(401), DeliveryOutcome::TransientFailure);
        assert_eq!(classify_status(413), DeliveryOutcome::TransientFailure);
        assert_eq!(classify_status(429), DeliveryOutcome::TransientFailure);
    }

    #[test]
    fn redirects_are_transient() {
        assert_eq!(classify_status(301), DeliveryOutcome::TransientFailure);
    }

    #[test]
    fn outcome_predicates() {
        assert!(DeliveryOutcome::Delivered.is_delivered());
        assert!(!DeliveryOutcome::Delivered.is_expired());
        assert!(DeliveryOutcome::Expired.is_expired());
        assert!(!DeliveryOutcome::TransientFailure.is_delivered());
    }
}
