//! Error types for Web Push cryptographic operations

use thiserror::Error;

/// Errors from key handling, VAPID signing, and message encryption.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key material failed validation (bad encoding, mismatched pair)
    #[error("invalid key material: {reason}")]
    InvalidKeyMaterial {
        /// Why the key material was rejected
        reason: String,
    },

    /// A field decoded to the wrong number of bytes
    #[error("invalid {field} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Which field had the wrong length
        field: &'static str,
        /// Expected byte length
        expected: usize,
        /// Actual byte length
        actual: usize,
    },

    /// Push endpoint URL could not be parsed or has no host
    #[error("invalid endpoint: {reason}")]
    InvalidEndpoint {
        /// Why the endpoint was rejected
        reason: String,
    },

    /// VAPID token signing failed
    #[error("signing failed: {reason}")]
    SigningFailed {
        /// Reason for the signing failure
        reason: String,
    },

    /// AEAD encryption rejected the inputs
    #[error("encryption failed: {reason}")]
    EncryptionFailed {
        /// Reason for the encryption failure
        reason: String,
    },

    /// Decryption failed (authentication tag mismatch, malformed padding)
    #[error("decryption failed: {reason}")]
    DecryptionFailed {
        /// Reason for the decryption failure
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CryptoError::InvalidLength { field: "auth secret", expected: 16, actual: 12 };
        assert_eq!(err.to_string(), "invalid auth secret length: expected 16 bytes, got 12");
    }

    #[test]
    fn endpoint_error_display() {
        let err = CryptoError::InvalidEndpoint { reason: "missing host".to_string() };
        assert_eq!(err.to_string(), "invalid endpoint: missing host");
    }
}
