//! VAPID key material: the application server's EC P-256 identity.
//!
//! Loaded once at process start and shared read-only for the process
//! lifetime. Signing is a pure function of (key, claims), so a single
//! instance is safe to share across concurrent dispatches.

use std::fmt;

use p256::ecdsa::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use zeroize::Zeroize;

use crate::b64;
use crate::error::CryptoError;

/// Uncompressed P-256 public key size (0x04 prefix + 32-byte x + 32-byte y)
pub const PUBLIC_KEY_SIZE: usize = 65;

/// Raw P-256 private scalar size
pub const PRIVATE_KEY_SIZE: usize = 32;

/// A validated VAPID EC P-256 key pair plus the operator contact URI.
///
/// # Invariants
///
/// - The public and private halves form a valid pair: construction
///   re-derives the public point from the scalar and rejects a mismatch.
/// - Immutable once constructed; the engine never rotates keys in-process.
#[derive(Clone)]
pub struct VapidKeyMaterial {
    signing_key: SigningKey,
    public_key: [u8; PUBLIC_KEY_SIZE],
    subject: String,
}

// The private scalar must never appear in logs.
impl fmt::Debug for VapidKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VapidKeyMaterial")
            .field("public_key", &b64::encode(&self.public_key))
            .field("private_key", &"<redacted>")
            .field("subject", &self.subject)
            .finish()
    }
}

impl VapidKeyMaterial {
    /// Build key material from the externally-stored URL-safe base64 forms.
    ///
    /// `public_b64` must decode to the 65-byte uncompressed point and
    /// `private_b64` to the raw 32-byte scalar. The pair is validated by
    /// re-deriving the public point from the scalar.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyMaterial`: undecodable input, a scalar outside the curve
    ///   order, or a public key that does not match the private scalar
    /// - `InvalidLength`: either key decodes to the wrong number of bytes
    pub fn from_base64(
        public_b64: &str,
        private_b64: &str,
        subject: impl Into<String>,
    ) -> Result<Self, CryptoError> {
        let public_raw = b64::decode(public_b64).map_err(|e| CryptoError::InvalidKeyMaterial {
            reason: format!("public key is not valid base64: {e}"),
        })?;
        let public_key: [u8; PUBLIC_KEY_SIZE] =
            public_raw.try_into().map_err(|bytes: Vec<u8>| CryptoError::InvalidLength {
                field: "public key",
                expected: PUBLIC_KEY_SIZE,
                actual: bytes.len(),
            })?;

        let private_raw = b64::decode(private_b64).map_err(|e| CryptoError::InvalidKeyMaterial {
            reason: format!("private key is not valid base64: {e}"),
        })?;
        let mut private_bytes: [u8; PRIVATE_KEY_SIZE] =
            private_raw.try_into().map_err(|bytes: Vec<u8>| CryptoError::InvalidLength {
                field: "private key",
                expected: PRIVATE_KEY_SIZE,
                actual: bytes.len(),
            })?;

        let signing_key = SigningKey::from_bytes(&private_bytes.into()).map_err(|e| {
            CryptoError::InvalidKeyMaterial { reason: format!("invalid private scalar: {e}") }
        });
        private_bytes.zeroize();
        let signing_key = signing_key?;

        let derived = encode_public(signing_key.verifying_key());
        if derived != public_key {
            return Err(CryptoError::InvalidKeyMaterial {
                reason: "public key does not match private scalar".to_string(),
            });
        }

        Ok(Self { signing_key, public_key, subject: subject.into() })
    }

    /// Generate a fresh key pair from OS randomness.
    ///
    /// Used by operator tooling to mint keys in the exact encoding
    /// [`from_base64`](Self::from_base64) consumes.
    pub fn generate(subject: impl Into<String>) -> Self {
        let signing_key = SigningKey::random(&mut OsRng);
        let public_key = encode_public(signing_key.verifying_key());
        Self { signing_key, public_key, subject: subject.into() }
    }

    /// Raw uncompressed public key point.
    pub fn public_key(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.public_key
    }

    /// Public key in the URL-safe base64 form used in the `k=` credential
    /// parameter and handed to subscribing clients.
    pub fn public_key_b64(&self) -> String {
        b64::encode(&self.public_key)
    }

    /// Private scalar in URL-safe base64.
    ///
    /// Only for exporting freshly generated keys to configuration. Never
    /// log the returned value.
    pub fn private_key_b64(&self) -> String {
        b64::encode(self.signing_key.to_bytes().as_slice())
    }

    /// Operator contact URI carried in the token `sub` claim.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

fn encode_public(verifying_key: &VerifyingKey) -> [u8; PUBLIC_KEY_SIZE] {
    let point = verifying_key.to_encoded_point(false);
    let mut bytes = [0u8; PUBLIC_KEY_SIZE];
    bytes.copy_from_slice(point.as_bytes());
    bytes
}
