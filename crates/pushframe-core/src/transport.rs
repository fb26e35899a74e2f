//! HTTP delivery to push services.
//!
//! One POST per subscription carrying the encrypted body and the
//! key-agreement headers of the `aesgcm` content encoding. The transport
//! is a trait so dispatcher tests can script push-service behavior without
//! a network.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Default time a push service should retain an undeliverable message.
pub const DEFAULT_TTL_SECS: u32 = 86_400;

/// Per-request timeout.
///
/// One slow push service must not stall the whole fan-out; a timed-out
/// request is classified transient.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// One fully-prepared delivery request.
///
/// Everything the wire protocol needs: the dispatcher fills this in and
/// the transport only adds the fixed headers.
#[derive(Debug, Clone)]
pub struct PushRequest {
    /// Push service endpoint URL
    pub endpoint: String,
    /// `Authorization` header value (`vapid t=...,k=...`)
    pub authorization: String,
    /// Salt for the `Encryption: salt=` header (URL-safe base64)
    pub salt_b64: String,
    /// Ephemeral sender key for the `Crypto-Key: dh=` header
    pub dh_b64: String,
    /// `TTL` header value in seconds
    pub ttl_secs: u32,
    /// Encrypted message body
    pub body: Vec<u8>,
}

/// Errors from the HTTP layer.
///
/// A transport error means no classifiable status was obtained; the
/// dispatcher treats every variant as a transient failure.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection failure, timeout, or protocol error
    #[error("push request failed: {reason}")]
    Failed {
        /// Underlying failure description
        reason: String,
    },
}

/// Delivery of one encrypted message to a push service.
#[async_trait]
pub trait PushTransport: Send + Sync + 'static {
    /// POST the request to its endpoint and return the HTTP status code.
    ///
    /// Implementations return `Ok` for any response the service produced,
    /// whatever the status; `Err` only when no response was obtained.
    async fn deliver(&self, request: PushRequest) -> Result<u16, TransportError>;
}

/// Production transport backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport with the default per-request timeout.
    ///
    /// # Errors
    ///
    /// `TransportError::Failed` if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    /// Build a transport with a custom per-request timeout.
    ///
    /// # Errors
    ///
    /// `TransportError::Failed` if the TLS backend cannot be initialized.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Failed { reason: format!("client build: {e}") })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PushTransport for HttpTransport {
    async fn deliver(&self, request: PushRequest) -> Result<u16, TransportError> {
        let response = self
            .client
            .post(&request.endpoint)
            .header("Authorization", &request.authorization)
            .header("Content-Type", "application/octet-stream")
            .header("Content-Encoding", "aesgcm")
            .header("Encryption", format!("salt={}", request.salt_b64))
            .header("Crypto-Key", format!("dh={}", request.dh_b64))
            .header("TTL", request.ttl_secs.to_string())
            .header("Urgency", "normal")
            .body(request.body)
            .send()
            .await
            .map_err(|e| TransportError::Failed { reason: e.to_string() })?;

        Ok(response.status().as_u16())
    }
}
