//! Message encryption using AES-128-GCM
//!
//! `encrypt_message` is pure - the ephemeral secret and salt are provided
//! by the caller, which enables deterministic testing. `seal_message` is
//! the production entry point and draws both from OS randomness.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes128Gcm, Key, Nonce};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::{PublicKey, SecretKey};
use rand::RngCore;
use rand::rngs::OsRng;

use super::derivation::{AUTH_SECRET_SIZE, SALT_SIZE, derive_message_keys};
use crate::b64;
use crate::error::CryptoError;
use crate::keys::PUBLIC_KEY_SIZE;

/// Two-byte padding-length field prepended to every plaintext
const PAD_PREFIX_SIZE: usize = 2;

/// GCM tag size (16 bytes)
const GCM_TAG_SIZE: usize = 16;

/// An encrypted push message plus the public values the receiver needs.
///
/// Ephemeral: produced and consumed within one delivery attempt. The salt
/// and sender key are single-use; a second message to the same subscription
/// gets fresh ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedMessage {
    /// AES-128-GCM output including the 16-byte authentication tag
    pub ciphertext: Vec<u8>,
    /// Per-message random salt, sent in the `Encryption` header
    pub salt: [u8; SALT_SIZE],
    /// Ephemeral sender public key (uncompressed point), sent in the
    /// `Crypto-Key` header
    pub sender_public: [u8; PUBLIC_KEY_SIZE],
}

impl EncryptedMessage {
    /// Salt in the URL-safe base64 form for the `Encryption: salt=` header.
    pub fn salt_b64(&self) -> String {
        b64::encode(&self.salt)
    }

    /// Sender public key in the URL-safe base64 form for the
    /// `Crypto-Key: dh=` header.
    pub fn sender_public_b64(&self) -> String {
        b64::encode(&self.sender_public)
    }

    /// Plaintext length (ciphertext minus tag and padding prefix).
    pub fn plaintext_len(&self) -> usize {
        self.ciphertext.len().saturating_sub(GCM_TAG_SIZE + PAD_PREFIX_SIZE)
    }
}

/// Encrypt a payload for one subscription with caller-provided randomness.
///
/// The caller MUST provide a freshly generated `sender_secret` and `salt`
/// for every message in production; both are single-use.
///
/// # Errors
///
/// - `EncryptionFailed`: the AEAD primitive rejected the inputs
pub fn encrypt_message(
    plaintext: &[u8],
    receiver_public: &PublicKey,
    auth_secret: &[u8; AUTH_SECRET_SIZE],
    sender_secret: &SecretKey,
    salt: [u8; SALT_SIZE],
) -> Result<EncryptedMessage, CryptoError> {
    let sender_public = encode_point(&sender_secret.public_key());
    let receiver_bytes = encode_point(receiver_public);

    let shared = p256::ecdh::diffie_hellman(
        sender_secret.to_nonzero_scalar(),
        receiver_public.as_affine(),
    );

    let keys = derive_message_keys(
        shared.raw_secret_bytes().as_slice(),
        auth_secret,
        &salt,
        &receiver_bytes,
        &sender_public,
    );

    // Padding convention: two-byte pad length, zero padding bytes used
    let mut padded = Vec::with_capacity(PAD_PREFIX_SIZE + plaintext.len());
    padded.extend_from_slice(&[0u8, 0u8]);
    padded.extend_from_slice(plaintext);

    let cipher = Aes128Gcm::new(Key::<Aes128Gcm>::from_slice(&keys.cek));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&keys.nonce), padded.as_slice())
        .map_err(|_| CryptoError::EncryptionFailed { reason: "AEAD rejected input".to_string() })?;

    Ok(EncryptedMessage { ciphertext, salt, sender_public })
}

/// Encrypt a payload for one subscription using OS randomness.
///
/// Decodes the subscription's URL-safe base64 key material, generates a
/// fresh ephemeral key pair and salt, and encrypts.
///
/// # Errors
///
/// - `InvalidKeyMaterial` / `InvalidLength`: malformed subscription keys
/// - `EncryptionFailed`: the AEAD primitive rejected the inputs
pub fn seal_message(
    plaintext: &[u8],
    receiver_public_b64: &str,
    auth_secret_b64: &str,
) -> Result<EncryptedMessage, CryptoError> {
    let receiver_raw = b64::decode(receiver_public_b64).map_err(|e| {
        CryptoError::InvalidKeyMaterial { reason: format!("p256dh is not valid base64: {e}") }
    })?;
    if receiver_raw.len() != PUBLIC_KEY_SIZE {
        return Err(CryptoError::InvalidLength {
            field: "p256dh key",
            expected: PUBLIC_KEY_SIZE,
            actual: receiver_raw.len(),
        });
    }
    let receiver_public = PublicKey::from_sec1_bytes(&receiver_raw).map_err(|e| {
        CryptoError::InvalidKeyMaterial { reason: format!("p256dh is not a valid point: {e}") }
    })?;

    let auth_raw = b64::decode(auth_secret_b64).map_err(|e| CryptoError::InvalidKeyMaterial {
        reason: format!("auth secret is not valid base64: {e}"),
    })?;
    let auth_secret: [u8; AUTH_SECRET_SIZE] =
        auth_raw.try_into().map_err(|bytes: Vec<u8>| CryptoError::InvalidLength {
            field: "auth secret",
            expected: AUTH_SECRET_SIZE,
            actual: bytes.len(),
        })?;

    let sender_secret = SecretKey::random(&mut OsRng);
    let mut salt = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);

    encrypt_message(plaintext, &receiver_public, &auth_secret, &sender_secret, salt)
}

/// Decrypt a message as the receiving device would.
///
/// The reference counterpart to [`encrypt_message`]: derives the same keys
/// from the receiver's private half and strips the padding prefix. Used for
/// round-trip verification.
///
/// # Errors
///
/// - `InvalidKeyMaterial`: the sender public key is not a valid point
/// - `DecryptionFailed`: authentication tag mismatch or malformed padding
pub fn decrypt_message(
    message: &EncryptedMessage,
    receiver_secret: &SecretKey,
    auth_secret: &[u8; AUTH_SECRET_SIZE],
) -> Result<Vec<u8>, CryptoError> {
    let receiver_bytes = encode_point(&receiver_secret.public_key());

    let sender_public = PublicKey::from_sec1_bytes(&message.sender_public).map_err(|e| {
        CryptoError::InvalidKeyMaterial { reason: format!("sender key is not a valid point: {e}") }
    })?;

    let shared = p256::ecdh::diffie_hellman(
        receiver_secret.to_nonzero_scalar(),
        sender_public.as_affine(),
    );

    let keys = derive_message_keys(
        shared.raw_secret_bytes().as_slice(),
        auth_secret,
        &message.salt,
        &receiver_bytes,
        &message.sender_public,
    );

    let cipher = Aes128Gcm::new(Key::<Aes128Gcm>::from_slice(&keys.cek));
    let padded = cipher
        .decrypt(Nonce::from_slice(&keys.nonce), message.ciphertext.as_slice())
        .map_err(|_| CryptoError::DecryptionFailed {
            reason: "authentication failed".to_string(),
        })?;

    strip_padding(&padded)
}

/// Remove the two-byte padding-length prefix and the padding it declares.
fn strip_padding(padded: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if padded.len() < PAD_PREFIX_SIZE {
        return Err(CryptoError::DecryptionFailed {
            reason: "record shorter than padding prefix".to_string(),
        });
    }

    let pad_len = u16::from_be_bytes([padded[0], padded[1]]) as usize;
    let data_start = PAD_PREFIX_SIZE + pad_len;
    if data_start > padded.len() {
        return Err(CryptoError::DecryptionFailed {
            reason: format!("padding length {pad_len} exceeds record"),
        });
    }

    if padded[PAD_PREFIX_SIZE..data_start].iter().any(|&byte| byte != 0) {
        return Err(CryptoError::DecryptionFailed {
            reason: "non-zero padding bytes".to_string(),
        });
    }

    Ok(padded[data_start..].to_vec())
}

fn encode_point(public: &PublicKey) -> [u8; PUBLIC_KEY_SIZE] {
    let point = public.to_encoded_point(false);
    let mut bytes = [0u8; PUBLIC_KEY_SIZE];
    bytes.copy_from_slice(point.as_bytes());
    bytes
}
