//! Fuzz target for the full encrypt/decrypt pipeline
//!
//! Encrypts arbitrary payloads with arbitrary salts and key seeds, then
//! decrypts with the matching receiver key.
//!
//! # Invariants
//!
//! - Round-trip recovers the exact plaintext for every input
//! - Corrupting the first ciphertext byte always fails authentication

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use p256::SecretKey;
use pushframe_crypto::{AUTH_SECRET_SIZE, SALT_SIZE, decrypt_message, encrypt_message};

#[derive(Debug, Arbitrary)]
struct RoundtripScenario {
    plaintext: Vec<u8>,
    salt: [u8; SALT_SIZE],
    auth_secret: [u8; AUTH_SECRET_SIZE],
    receiver_seed: u8,
    sender_seed: u8,
}

fn secret_from_seed(seed: u8) -> SecretKey {
    let mut scalar = [0u8; 32];
    scalar[31] = seed.max(1);
    SecretKey::from_slice(&scalar).expect("nonzero scalar below curve order")
}

fuzz_target!(|scenario: RoundtripScenario| {
    let receiver = secret_from_seed(scenario.receiver_seed);
    let sender = secret_from_seed(scenario.sender_seed.wrapping_add(101));

    let message = encrypt_message(
        &scenario.plaintext,
        &receiver.public_key(),
        &scenario.auth_secret,
        &sender,
        scenario.salt,
    )
    .expect("encryption of arbitrary plaintext must succeed");

    let decrypted = decrypt_message(&message, &receiver, &scenario.auth_secret)
        .expect("round-trip decryption must succeed");
    assert_eq!(decrypted, scenario.plaintext);

    if !message.ciphertext.is_empty() {
        let mut corrupted = message.clone();
        corrupted.ciphertext[0] ^= 0xFF;
        assert!(decrypt_message(&corrupted, &receiver, &scenario.auth_secret).is_err());
    }
});
