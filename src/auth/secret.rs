use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use tracing::warn;

/// Random bytes drawn for an ephemeral signing secret.
pub const EPHEMERAL_SECRET_BYTES: usize = 32;

/// HMAC key used to sign and verify tokens.
///
/// An `Ephemeral` secret only lives as long as the process: tokens signed
/// with it are rejected after a restart and by every other instance.
#[derive(Clone)]
pub enum SigningSecret {
    Provided(SecretString),
    Ephemeral(SecretString),
}

impl SigningSecret {
    /// Generate a fresh secret from the OS random number generator.
    #[must_use]
    pub fn ephemeral() -> Self {
        let mut bytes = [0u8; EPHEMERAL_SECRET_BYTES];
        OsRng.fill_bytes(&mut bytes);

        Self::Ephemeral(SecretString::from(Base64UrlUnpadded::encode_string(
            &bytes,
        )))
    }

    /// Use the configured secret, or fall back to an ephemeral one when it is
    /// missing or empty.
    #[must_use]
    pub fn from_config(secret: Option<SecretString>) -> Self {
        match secret {
            Some(secret) if !secret.expose_secret().is_empty() => Self::Provided(secret),
            _ => {
                warn!(
                    "No JWT secret configured, using an ephemeral secret: tokens will not survive a restart"
                );

                Self::ephemeral()
            }
        }
    }

    #[must_use]
    pub const fn is_ephemeral(&self) -> bool {
        matches!(self, Self::Ephemeral(_))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Provided(secret) | Self::Ephemeral(secret) => secret.expose_secret().as_bytes(),
        }
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provided(_) => f.write_str("Provided(***)"),
            Self::Ephemeral(_) => f.write_str("Ephemeral(***)"),
        }
    }
}
