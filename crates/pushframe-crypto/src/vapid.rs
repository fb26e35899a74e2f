//! VAPID request authentication (RFC 8292 lineage).
//!
//! Builds the `Authorization: vapid t=<token>,k=<publicKey>` credential a
//! push service requires before it relays a message. The token is a
//! JWT-shaped ES256 signature over claims bound to the push service origin,
//! valid for a bounded window.
//!
//! Signing takes the current time as an explicit parameter so it stays a
//! pure function; callers supply wall-clock time at dispatch.

use p256::ecdsa::Signature;
use p256::ecdsa::signature::Signer;
use serde::Serialize;
use url::Url;

use crate::b64;
use crate::error::CryptoError;
use crate::keys::VapidKeyMaterial;

/// Token validity window: 12 hours.
///
/// Long enough that a retrying caller does not re-sign inside a short
/// backoff window, short enough to limit replay value if a token leaks.
pub const TOKEN_LIFETIME_SECS: u64 = 12 * 60 * 60;

#[derive(Serialize)]
struct Claims<'a> {
    aud: &'a str,
    exp: u64,
    sub: &'a str,
}

/// Compute the audience for a push endpoint: scheme and host only.
///
/// The push service validates the token against its own origin, so path and
/// query must be stripped. An explicit port is preserved; it is part of the
/// origin the service sees.
///
/// # Errors
///
/// `InvalidEndpoint` if the endpoint is not a parseable URL or has no host.
pub fn endpoint_audience(endpoint: &str) -> Result<String, CryptoError> {
    let url = Url::parse(endpoint)
        .map_err(|e| CryptoError::InvalidEndpoint { reason: format!("not a URL: {e}") })?;
    let host = url
        .host_str()
        .ok_or_else(|| CryptoError::InvalidEndpoint { reason: "missing host".to_string() })?;

    Ok(match url.port() {
        Some(port) => format!("{}://{host}:{port}", url.scheme()),
        None => format!("{}://{host}", url.scheme()),
    })
}

/// Sign a VAPID token for one push service origin.
///
/// The token is `b64url(header) . b64url(claims) . b64url(signature)` with
/// an ES256 header, claims `{aud, exp, sub}`, and the ECDSA P-256/SHA-256
/// signature in raw `r || s` form (64 bytes), not DER.
///
/// # Errors
///
/// `SigningFailed` if claim serialization fails.
pub fn sign_token(
    keys: &VapidKeyMaterial,
    audience: &str,
    now_unix: u64,
) -> Result<String, CryptoError> {
    let header = serde_json::json!({ "typ": "JWT", "alg": "ES256" });
    let claims = Claims {
        aud: audience,
        exp: now_unix + TOKEN_LIFETIME_SECS,
        sub: keys.subject(),
    };

    let header_json = serde_json::to_vec(&header)
        .map_err(|e| CryptoError::SigningFailed { reason: format!("header encoding: {e}") })?;
    let claims_json = serde_json::to_vec(&claims)
        .map_err(|e| CryptoError::SigningFailed { reason: format!("claims encoding: {e}") })?;

    let signing_input = format!("{}.{}", b64::encode(&header_json), b64::encode(&claims_json));

    let signature: Signature = keys.signing_key().sign(signing_input.as_bytes());

    Ok(format!("{signing_input}.{}", b64::encode(signature.to_bytes().as_slice())))
}

/// Build the full `Authorization` header value for one push endpoint.
///
/// Combines a freshly signed token with the raw public key:
/// `vapid t=<token>,k=<publicKey>`.
///
/// # Errors
///
/// `InvalidEndpoint` for an unparseable endpoint, `SigningFailed` if
/// signing fails.
pub fn authorization_header(
    keys: &VapidKeyMaterial,
    endpoint: &str,
    now_unix: u64,
) -> Result<String, CryptoError> {
    let audience = endpoint_audience(endpoint)?;
    let token = sign_token(keys, &audience, now_unix)?;
    Ok(format!("vapid t={token},k={}", keys.public_key_b64()))
}
