use crate::auth::{error::TokenError, secret::SigningSecret};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration, time::SystemTime};
use tracing::debug;

pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    pub exp: i64,
}

/// Issues and verifies HS256 bearer tokens.
///
/// Holds the signing keys for its whole lifetime; share it behind an `Arc`.
pub struct TokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
    ephemeral: bool,
}

impl TokenAuthority {
    #[must_use]
    pub fn new(secret: &SigningSecret, ttl: Duration) -> Self {
        // Expiry is checked against our own clock in `verify_at`, so the
        // library only validates the signature and claim presence.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
            ephemeral: secret.is_ephemeral(),
        }
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    #[must_use]
    pub const fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }

    /// Issue a token for `subject` valid for the configured TTL.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::EmptySubject` for an empty subject, or
    /// `TokenError::Encode` if signing fails.
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_at(subject, self.ttl, now_unix_seconds())
    }

    /// Issue a token for `subject` valid for `ttl`.
    ///
    /// # Errors
    ///
    /// See [`TokenAuthority::issue`].
    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        self.issue_at(subject, ttl, now_unix_seconds())
    }

    /// Issue a token as if the current time were `now_unix_seconds`.
    ///
    /// # Errors
    ///
    /// See [`TokenAuthority::issue`].
    pub fn issue_at(
        &self,
        subject: &str,
        ttl: Duration,
        now_unix_seconds: i64,
    ) -> Result<String, TokenError> {
        if subject.is_empty() {
            return Err(TokenError::EmptySubject);
        }

        let ttl_seconds = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: subject.to_string(),
            iat: Some(now_unix_seconds),
            exp: now_unix_seconds.saturating_add(ttl_seconds),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Encode)
    }

    /// Verify `token` and return the subject it was issued for.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` if the token is malformed, signed with
    /// another secret, has no subject, or has expired.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        self.verify_at(token, now_unix_seconds())
    }

    /// Verify `token` as if the current time were `now_unix_seconds`.
    ///
    /// # Errors
    ///
    /// See [`TokenAuthority::verify`].
    pub fn verify_at(&self, token: &str, now_unix_seconds: i64) -> Result<String, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!("Token rejected: {e}");

                TokenError::Invalid
            })?
            .claims;

        if claims.sub.is_empty() {
            debug!("Token rejected: empty subject");
            return Err(TokenError::Invalid);
        }

        if claims.exp <= now_unix_seconds {
            debug!("Token rejected: expired at {}", claims.exp);
            return Err(TokenError::Invalid);
        }

        Ok(claims.sub)
    }
}

impl fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("secret", &"***")
            .field("ttl", &self.ttl)
            .field("ephemeral", &self.ephemeral)
            .finish()
    }
}

pub fn now_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
