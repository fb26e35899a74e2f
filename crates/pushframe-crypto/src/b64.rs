//! URL-safe base64 helpers.
//!
//! All Web Push encodings are URL-safe base64 without padding characters:
//! subscription keys, salts, ephemeral public keys, and VAPID token parts.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Encode bytes as URL-safe base64 without padding.
pub fn encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Decode URL-safe base64 without padding.
///
/// Padded input is rejected; browsers and push services emit the unpadded
/// form exclusively.
pub fn decode(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(input.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let bytes = [0u8, 1, 2, 253, 254, 255];
        assert_eq!(decode(&encode(&bytes)).unwrap(), bytes);
    }

    #[test]
    fn no_padding_characters() {
        // 16 bytes would need padding in the standard alphabet
        let encoded = encode(&[0xAB; 16]);
        assert!(!encoded.contains('='));
    }

    #[test]
    fn url_safe_alphabet() {
        // 0xFB 0xEF 0xBE encodes to "++++" in the standard alphabet
        let encoded = encode(&[0xFB, 0xEF, 0xBE]);
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
    }

    #[test]
    fn rejects_invalid_input() {
        assert!(decode("not valid base64!!!").is_err());
    }
}
