//! Fuzz target for `aesgcm` message decryption
//!
//! Feeds arbitrary ciphertext, salt, and sender-key bytes through the
//! receiver-side pipeline.
//!
//! # Invariants
//!
//! - Decryption never panics, whatever the input bytes
//! - Garbage sender keys are rejected as errors, not crashes
//! - A successful decrypt of adversarial input is effectively impossible
//!   (GCM tag forgery); any `Ok` here with non-derived keys is a bug

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use p256::SecretKey;
use pushframe_crypto::{
    AUTH_SECRET_SIZE, EncryptedMessage, PUBLIC_KEY_SIZE, SALT_SIZE, decrypt_message,
};

#[derive(Debug, Arbitrary)]
struct DecryptScenario {
    ciphertext: Vec<u8>,
    salt: [u8; SALT_SIZE],
    sender_public: [u8; PUBLIC_KEY_SIZE],
    auth_secret: [u8; AUTH_SECRET_SIZE],
    receiver_seed: u8,
}

fuzz_target!(|scenario: DecryptScenario| {
    let mut scalar = [0u8; 32];
    scalar[31] = scenario.receiver_seed.max(1);
    let receiver = SecretKey::from_slice(&scalar).expect("nonzero scalar below curve order");

    let message = EncryptedMessage {
        ciphertext: scenario.ciphertext,
        salt: scenario.salt,
        sender_public: scenario.sender_public,
    };

    // INVARIANT: never panics; arbitrary bytes must fail cleanly
    let result = decrypt_message(&message, &receiver, &scenario.auth_secret);
    assert!(result.is_err(), "forged ciphertext must not authenticate");
});
