//! VAPID configuration loading.
//!
//! Key material comes from the process environment and is read once at
//! startup. Push is an optional channel: both keys absent means the engine
//! runs in a disabled state and every dispatch reports "not configured"
//! instead of failing the process.

use thiserror::Error;

use pushframe_crypto::{CryptoError, VapidKeyMaterial};

/// Environment variable holding the URL-safe base64 VAPID public key.
pub const ENV_PUBLIC_KEY: &str = "PUSH_VAPID_PUBLIC_KEY";

/// Environment variable holding the URL-safe base64 VAPID private key.
pub const ENV_PRIVATE_KEY: &str = "PUSH_VAPID_PRIVATE_KEY";

/// Environment variable holding the operator contact URI.
pub const ENV_SUBJECT: &str = "PUSH_VAPID_SUBJECT";

/// Contact URI used when the operator does not configure one.
pub const DEFAULT_SUBJECT: &str = "mailto:push@example.com";

/// Configuration failures that are NOT the soft "push disabled" state.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Exactly one of the two keys was set; almost certainly a deployment
    /// mistake, so it is surfaced instead of silently disabling push
    #[error("{present} is set but {missing} is not; set both or neither")]
    PartialKeyPair {
        /// The variable that was set
        present: &'static str,
        /// The variable that was missing
        missing: &'static str,
    },

    /// Keys were present but rejected by validation
    #[error(transparent)]
    InvalidKeys(#[from] CryptoError),
}

/// Load VAPID key material from the process environment.
///
/// Returns `Ok(None)` when both keys are absent (push disabled),
/// `Ok(Some(...))` for a valid configuration.
///
/// # Errors
///
/// [`ConfigError`] for a half-configured or malformed key pair.
pub fn vapid_from_env() -> Result<Option<VapidKeyMaterial>, ConfigError> {
    vapid_from_values(
        env_var(ENV_PUBLIC_KEY).as_deref(),
        env_var(ENV_PRIVATE_KEY).as_deref(),
        env_var(ENV_SUBJECT).as_deref(),
    )
}

/// Pure form of [`vapid_from_env`] for explicit configuration sources.
///
/// # Errors
///
/// [`ConfigError`] for a half-configured or malformed key pair.
pub fn vapid_from_values(
    public_key: Option<&str>,
    private_key: Option<&str>,
    subject: Option<&str>,
) -> Result<Option<VapidKeyMaterial>, ConfigError> {
    let (public_key, private_key) = match (public_key, private_key) {
        (None, None) => return Ok(None),
        (Some(public), Some(private)) => (public, private),
        (Some(_), None) => {
            return Err(ConfigError::PartialKeyPair {
                present: ENV_PUBLIC_KEY,
                missing: ENV_PRIVATE_KEY,
            });
        },
        (None, Some(_)) => {
            return Err(ConfigError::PartialKeyPair {
                present: ENV_PRIVATE_KEY,
                missing: ENV_PUBLIC_KEY,
            });
        },
    };

    let subject = subject.unwrap_or(DEFAULT_SUBJECT);
    Ok(Some(VapidKeyMaterial::from_base64(public_key, private_key, subject)?))
}

/// Read an environment variable, treating empty/whitespace values as unset.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().map(|value| value.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated() -> (String, String) {
        let keys = VapidKeyMaterial::generate("mailto:test@example.com");
        (keys.public_key_b64(), keys.private_key_b64())
    }

    #[test]
    fn absent_keys_disable_push() {
        assert!(vapid_from_values(None, None, None).unwrap().is_none());
    }

    #[test]
    fn absent_keys_ignore_subject() {
        // A configured subject without keys is still "disabled"
        assert!(vapid_from_values(None, None, Some("mailto:x@example.com")).unwrap().is_none());
    }

    #[test]
    fn full_configuration_loads() {
        let (public, private) = generated();

        let keys = vapid_from_values(
            Some(&public),
            Some(&private),
            Some("mailto:ops@example.com"),
        )
        .unwrap()
        .unwrap();

        assert_eq!(keys.public_key_b64(), public);
        assert_eq!(keys.subject(), "mailto:ops@example.com");
    }

    #[test]
    fn missing_subject_falls_back() {
        let (public, private) = generated();

        let keys = vapid_from_values(Some(&public), Some(&private), None).unwrap().unwrap();

        assert_eq!(keys.subject(), DEFAULT_SUBJECT);
    }

    #[test]
    fn partial_pair_is_an_error() {
        let (public, private) = generated();

        assert!(matches!(
            vapid_from_values(Some(&public), None, None),
            Err(ConfigError::PartialKeyPair { present: ENV_PUBLIC_KEY, .. })
        ));
        assert!(matches!(
            vapid_from_values(None, Some(&private), None),
            Err(ConfigError::PartialKeyPair { present: ENV_PRIVATE_KEY, .. })
        ));
    }

    #[test]
    fn malformed_keys_are_an_error() {
        let result = vapid_from_values(Some("!!!"), Some("!!!"), None);
        assert!(matches!(result, Err(ConfigError::InvalidKeys(_))));
    }
}
