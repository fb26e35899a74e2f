//! Legacy `aesgcm` Web Push content encoding.
//!
//! The ECDH-based scheme from the draft Web Push encryption spec, kept for
//! wire compatibility with push services that predate the single-record
//! `aes128gcm` format. The salt and ephemeral key travel out-of-band in the
//! `Encryption` and `Crypto-Key` request headers rather than in a body
//! header block, and the plaintext carries a two-byte padding-length prefix.

mod derivation;
mod encryption;

pub use derivation::{
    AUTH_SECRET_SIZE, CEK_SIZE, MessageKeys, NONCE_SIZE, SALT_SIZE, derive_message_keys,
};
pub use encryption::{EncryptedMessage, decrypt_message, encrypt_message, seal_message};
