//! Notification values and the encrypted wire payload.
//!
//! The caller supplies a [`Notification`]; the dispatcher stamps the
//! creation time and serializes the resulting [`NotificationPayload`]
//! exactly once per dispatch call, so every subscription of a recipient
//! encrypts identical plaintext bytes.

use serde::Serialize;

/// Caller-facing notification content.
///
/// Only `title` is required; everything else is a display or navigation
/// hint passed through to the client-side handler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Notification {
    /// Display title
    pub title: String,
    /// Display body text
    pub body: Option<String>,
    /// Icon URL hint
    pub icon: Option<String>,
    /// Badge URL hint
    pub badge: Option<String>,
    /// Click-through URL
    pub url: Option<String>,
    /// Free-form structured metadata for the client handler
    pub data: Option<serde_json::Value>,
}

impl Notification {
    /// Notification with a title and no optional fields.
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Self::default() }
    }

    /// Attach the dispatch timestamp, producing the wire payload.
    pub fn into_payload(self, timestamp_ms: u64) -> NotificationPayload {
        NotificationPayload {
            title: self.title,
            body: self.body,
            icon: self.icon,
            badge: self.badge,
            url: self.url,
            data: self.data,
            timestamp: timestamp_ms,
        }
    }
}

/// The serialized notification as the service worker receives it.
///
/// Immutable once constructed; `timestamp` is set by the dispatcher, not
/// the caller.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NotificationPayload {
    /// Display title
    pub title: String,
    /// Display body text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Icon URL hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Badge URL hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    /// Click-through URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Free-form structured metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Dispatch time, unix milliseconds
    pub timestamp: u64,
}

impl NotificationPayload {
    /// Serialize to the JSON bytes handed to the message cipher.
    ///
    /// # Errors
    ///
    /// `serde_json::Error` if the caller-supplied `data` value cannot be
    /// serialized (non-string map keys).
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
