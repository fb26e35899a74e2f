//! Pushframe Cryptographic Primitives
//!
//! Cryptographic building blocks for Web Push delivery. Pure functions with
//! deterministic outputs. Callers provide random material (ephemeral secrets,
//! salts) for deterministic testing; `seal_message` and
//! [`VapidKeyMaterial::generate`](keys::VapidKeyMaterial::generate) are the
//! OS-randomness entry points for production use.
//!
//! # Message Pipeline
//!
//! Each push message is encrypted under the legacy `aesgcm` Web Push content
//! encoding. A fresh ephemeral key pair and salt are used per message:
//!
//! ```text
//! ECDH(ephemeral secret, subscription p256dh)
//!        │
//!        ▼
//! HKDF (salt = auth secret) → PRK
//!        │
//!        ▼
//! HKDF (salt = message salt) → CEK (16 bytes) + nonce (12 bytes)
//!        │
//!        ▼
//! AES-128-GCM → Ciphertext
//! ```
//!
//! The ephemeral secret and salt are single-use. Reusing either across
//! messages would leak ciphertext-equality information and violates the
//! scheme's security contract.
//!
//! # VAPID
//!
//! Request authentication uses a VAPID credential: an ES256-signed token
//! bound to the push service origin plus the application server's public
//! key, formatted as `vapid t=<token>,k=<publicKey>`. Tokens are valid for
//! twelve hours and are signed fresh for every dispatch.
//!
//! # Security
//!
//! - The VAPID private scalar never leaves [`keys::VapidKeyMaterial`]; its
//!   `Debug` output is redacted and transient copies are zeroized.
//! - ECDSA signatures are produced in raw `r || s` form as push services
//!   require, never ASN.1 DER.
//! - Derived content-encryption keys are zeroized on drop.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod aesgcm;
pub mod b64;
pub mod error;
pub mod keys;
pub mod vapid;

pub use aesgcm::{
    AUTH_SECRET_SIZE, CEK_SIZE, EncryptedMessage, MessageKeys, NONCE_SIZE, SALT_SIZE,
    decrypt_message, derive_message_keys, encrypt_message, seal_message,
};
pub use error::CryptoError;
pub use keys::{PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE, VapidKeyMaterial};
pub use vapid::{TOKEN_LIFETIME_SECS, authorization_header, endpoint_audience, sign_token};
