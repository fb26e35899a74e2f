//! Fuzz target for VAPID audience computation
//!
//! # Invariants
//!
//! - Audience parsing never panics on arbitrary input
//! - A computed audience never carries a path or query

#![no_main]

use libfuzzer_sys::fuzz_target;
use pushframe_crypto::endpoint_audience;

fuzz_target!(|endpoint: &str| {
    if let Ok(audience) = endpoint_audience(endpoint) {
        let after_scheme = audience.split_once("://").map(|(_, rest)| rest).unwrap_or("");
        assert!(!after_scheme.contains('/'), "audience must not carry a path");
        assert!(!after_scheme.contains('?'), "audience must not carry a query");
    }
});
