//! Key derivation for the `aesgcm` content encoding using HKDF
//!
//! Two HKDF-SHA256 steps turn the ECDH shared secret into the AES-128-GCM
//! content-encryption key and nonce. The byte layout of the `info`
//! parameters is fixed by the draft scheme and must be reproduced exactly;
//! the receiving device derives the same values independently and any
//! deviation makes the message undecryptable.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::keys::PUBLIC_KEY_SIZE;

/// Recipient-chosen auth secret size
pub const AUTH_SECRET_SIZE: usize = 16;

/// Per-message salt size
pub const SALT_SIZE: usize = 16;

/// Content-encryption key size (AES-128)
pub const CEK_SIZE: usize = 16;

/// AES-GCM nonce size
pub const NONCE_SIZE: usize = 12;

/// Info string for the PRK extraction step
const AUTH_INFO: &[u8] = b"Content-Encoding: auth\0";

/// Info prefix for content-encryption key expansion
const CEK_INFO_PREFIX: &[u8] = b"Content-Encoding: aesgcm\0";

/// Info prefix for nonce expansion
const NONCE_INFO_PREFIX: &[u8] = b"Content-Encoding: nonce\0";

/// Curve label leading the key-agreement context
const CURVE_LABEL: &[u8] = b"P-256\0";

/// Pseudorandom key size from the first HKDF step
const PRK_SIZE: usize = 32;

/// Derived key material for one message.
///
/// Single-use: encrypt exactly one payload, then drop. The
/// content-encryption key is zeroized on drop.
pub struct MessageKeys {
    /// 16-byte AES-128-GCM content-encryption key
    pub cek: [u8; CEK_SIZE],
    /// 12-byte AES-GCM nonce
    pub nonce: [u8; NONCE_SIZE],
}

impl Drop for MessageKeys {
    fn drop(&mut self) {
        self.cek.zeroize();
    }
}

/// Derive the content-encryption key and nonce for one message.
///
/// Pure function of its inputs; the same five values always produce the
/// same keys, which is how the receiver decrypts. Layout:
///
/// 1. PRK = HKDF(salt = `auth_secret`, ikm = `shared_secret`,
///    info = `"Content-Encoding: auth"` + NUL, 32 bytes)
/// 2. CEK = HKDF(salt = `salt`, ikm = PRK,
///    info = `"Content-Encoding: aesgcm"` + NUL + context, 16 bytes)
/// 3. nonce = HKDF(salt = `salt`, ikm = PRK,
///    info = `"Content-Encoding: nonce"` + NUL + context, 12 bytes)
///
/// where context = `"P-256"` + NUL + len16(receiver) + receiver +
/// len16(sender) + sender, lengths big-endian.
pub fn derive_message_keys(
    shared_secret: &[u8],
    auth_secret: &[u8; AUTH_SECRET_SIZE],
    salt: &[u8; SALT_SIZE],
    receiver_public: &[u8; PUBLIC_KEY_SIZE],
    sender_public: &[u8; PUBLIC_KEY_SIZE],
) -> MessageKeys {
    let mut prk = [0u8; PRK_SIZE];
    let hkdf = Hkdf::<Sha256>::new(Some(auth_secret), shared_secret);
    let Ok(()) = hkdf.expand(AUTH_INFO, &mut prk) else {
        unreachable!("32 bytes is a valid HKDF-SHA256 output length");
    };

    let context = key_context(receiver_public, sender_public);
    let hkdf = Hkdf::<Sha256>::new(Some(salt), &prk);

    let mut cek = [0u8; CEK_SIZE];
    let Ok(()) = hkdf.expand(&build_info(CEK_INFO_PREFIX, &context), &mut cek) else {
        unreachable!("16 bytes is a valid HKDF-SHA256 output length");
    };

    let mut nonce = [0u8; NONCE_SIZE];
    let Ok(()) = hkdf.expand(&build_info(NONCE_INFO_PREFIX, &context), &mut nonce) else {
        unreachable!("12 bytes is a valid HKDF-SHA256 output length");
    };

    prk.zeroize();

    MessageKeys { cek, nonce }
}

/// Build the key-agreement context shared by both expansion infos.
///
/// Each public key is prefixed with its length as a two-byte big-endian
/// integer (always 0x00 0x41 for uncompressed P-256 points).
fn key_context(
    receiver_public: &[u8; PUBLIC_KEY_SIZE],
    sender_public: &[u8; PUBLIC_KEY_SIZE],
) -> Vec<u8> {
    // Capacity: 6 (label) + 2 + 65 + 2 + 65 = 140
    let mut context = Vec::with_capacity(CURVE_LABEL.len() + 2 * (2 + PUBLIC_KEY_SIZE));
    context.extend_from_slice(CURVE_LABEL);
    context.extend_from_slice(&(PUBLIC_KEY_SIZE as u16).to_be_bytes());
    context.extend_from_slice(receiver_public);
    context.extend_from_slice(&(PUBLIC_KEY_SIZE as u16).to_be_bytes());
    context.extend_from_slice(sender_public);
    context
}

fn build_info(prefix: &[u8], context: &[u8]) -> Vec<u8> {
    let mut info = Vec::with_capacity(prefix.len() + context.len());
    info.extend_from_slice(prefix);
    info.extend_from_slice(context);
    info
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receiver_key() -> [u8; PUBLIC_KEY_SIZE] {
        let mut key = [0xAAu8; PUBLIC_KEY_SIZE];
        key[0] = 0x04;
        key
    }

    fn sender_key() -> [u8; PUBLIC_KEY_SIZE] {
        let mut key = [0xBBu8; PUBLIC_KEY_SIZE];
        key[0] = 0x04;
        key
    }

    #[test]
    fn derivation_is_deterministic() {
        let shared = [0x11u8; 32];
        let auth = [0x22u8; AUTH_SECRET_SIZE];
        let salt = [0x33u8; SALT_SIZE];

        let keys1 = derive_message_keys(&shared, &auth, &salt, &receiver_key(), &sender_key());
        let keys2 = derive_message_keys(&shared, &auth, &salt, &receiver_key(), &sender_key());

        assert_eq!(keys1.cek, keys2.cek, "same inputs must produce same CEK");
        assert_eq!(keys1.nonce, keys2.nonce, "same inputs must produce same nonce");
    }

    #[test]
    fn different_salts_produce_different_keys() {
        let shared = [0x11u8; 32];
        let auth = [0x22u8; AUTH_SECRET_SIZE];

        let keys1 =
            derive_message_keys(&shared, &auth, &[0x33; SALT_SIZE], &receiver_key(), &sender_key());
        let keys2 =
            derive_message_keys(&shared, &auth, &[0x44; SALT_SIZE], &receiver_key(), &sender_key());

        assert_ne!(keys1.cek, keys2.cek);
        assert_ne!(keys1.nonce, keys2.nonce);
    }

    #[test]
    fn different_auth_secrets_produce_different_keys() {
        let shared = [0x11u8; 32];
        let salt = [0x33u8; SALT_SIZE];

        let keys1 =
            derive_message_keys(&shared, &[0x22; AUTH_SECRET_SIZE], &salt, &receiver_key(), &sender_key());
        let keys2 =
            derive_message_keys(&shared, &[0x55; AUTH_SECRET_SIZE], &salt, &receiver_key(), &sender_key());

        assert_ne!(keys1.cek, keys2.cek);
    }

    #[test]
    fn swapped_key_roles_produce_different_keys() {
        // Receiver and sender keys are not interchangeable in the context
        let shared = [0x11u8; 32];
        let auth = [0x22u8; AUTH_SECRET_SIZE];
        let salt = [0x33u8; SALT_SIZE];

        let keys1 = derive_message_keys(&shared, &auth, &salt, &receiver_key(), &sender_key());
        let keys2 = derive_message_keys(&shared, &auth, &salt, &sender_key(), &receiver_key());

        assert_ne!(keys1.cek, keys2.cek);
    }

    #[test]
    fn context_structure() {
        let context = key_context(&receiver_key(), &sender_key());

        assert_eq!(context.len(), 6 + 2 + 65 + 2 + 65);

        // Curve label with NUL terminator
        assert_eq!(&context[0..6], b"P-256\0");

        // Two-byte big-endian length prefix (65 = 0x0041) before each key
        assert_eq!(&context[6..8], &[0x00, 0x41]);
        assert_eq!(&context[8..73], &receiver_key());
        assert_eq!(&context[73..75], &[0x00, 0x41]);
        assert_eq!(&context[75..140], &sender_key());
    }

    #[test]
    fn info_prefixes_are_nul_terminated() {
        let context = key_context(&receiver_key(), &sender_key());

        let cek_info = build_info(CEK_INFO_PREFIX, &context);
        assert!(cek_info.starts_with(b"Content-Encoding: aesgcm\0"));
        assert!(cek_info.ends_with(&context[..]));

        let nonce_info = build_info(NONCE_INFO_PREFIX, &context);
        assert!(nonce_info.starts_with(b"Content-Encoding: nonce\0"));
    }

    #[test]
    fn derived_sizes_match_aes128_gcm() {
        let keys = derive_message_keys(
            &[0u8; 32],
            &[0u8; AUTH_SECRET_SIZE],
            &[0u8; SALT_SIZE],
            &receiver_key(),
            &sender_key(),
        );

        assert_eq!(keys.cek.len(), 16);
        assert_eq!(keys.nonce.len(), 12);
    }

    #[test]
    fn known_answer_vector() {
        // Expected values computed with an independent HKDF-SHA256
        // implementation over the same two-step layout
        let shared: Vec<u8> = (0u8..32).collect();
        let auth: [u8; AUTH_SECRET_SIZE] = core::array::from_fn(|i| 0x10 + i as u8);
        let salt: [u8; SALT_SIZE] = core::array::from_fn(|i| 0x20 + i as u8);
        let mut receiver = [0x05u8; PUBLIC_KEY_SIZE];
        receiver[0] = 0x04;
        let mut sender = [0x06u8; PUBLIC_KEY_SIZE];
        sender[0] = 0x04;

        let keys = derive_message_keys(&shared, &auth, &salt, &receiver, &sender);

        assert_eq!(hex::encode(keys.cek), "eeea33c01c08e39765efb952bb24c9f7");
        assert_eq!(hex::encode(keys.nonce), "dca3c109ff3ac50a1d5a5bbd");
    }

    #[test]
    fn works_with_empty_shared_secret() {
        // Edge case: degenerate input should still produce valid output
        let keys = derive_message_keys(
            &[],
            &[0u8; AUTH_SECRET_SIZE],
            &[0u8; SALT_SIZE],
            &receiver_key(),
            &sender_key(),
        );
        assert_eq!(keys.cek.len(), CEK_SIZE);
    }
}
