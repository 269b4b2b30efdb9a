//! Password hashing with bcrypt.
//!
//! bcrypt only consumes the first 72 bytes of its input. Rather than leaving
//! that to the primitive, passwords are truncated explicitly before both
//! hashing and verification, so two passwords sharing a 72-byte prefix are
//! the same password as far as this module is concerned.

use crate::auth::error::HashError;
use std::fmt;
use tracing::debug;

/// Maximum number of password bytes that take part in the hash.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Encoded bcrypt hash (`$2b$<cost>$<salt><hash>`), salt included.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Credential {
    fn from(encoded: String) -> Self {
        Self(encoded)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialHasher {
    cost: u32,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl CredentialHasher {
    /// Create a hasher with the given bcrypt work factor.
    ///
    /// # Errors
    ///
    /// Returns `HashError::InvalidCost` if `cost` is outside `4..=31`.
    pub fn new(cost: u32) -> Result<Self, HashError> {
        if !(4..=31).contains(&cost) {
            return Err(HashError::InvalidCost(cost));
        }

        Ok(Self { cost })
    }

    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash `password` with a fresh random salt.
    ///
    /// This is CPU bound by design; async callers should run it on a blocking
    /// thread.
    ///
    /// # Errors
    ///
    /// Returns `HashError::EmptyPassword` for an empty password, or
    /// `HashError::Bcrypt` if the primitive itself fails.
    pub fn hash(&self, password: &str) -> Result<Credential, HashError> {
        if password.is_empty() {
            return Err(HashError::EmptyPassword);
        }

        let encoded = bcrypt::hash(truncate(password), self.cost)?;

        Ok(Credential(encoded))
    }

    /// Check `password` against a stored credential.
    ///
    /// Any failure, including a corrupt credential, reads as a mismatch.
    #[must_use]
    pub fn verify(&self, password: &str, credential: &Credential) -> bool {
        match bcrypt::verify(truncate(password), credential.as_str()) {
            Ok(valid) => valid,
            Err(e) => {
                debug!("Credential verification failed: {e}");

                false
            }
        }
    }
}

fn truncate(password: &str) -> &[u8] {
    let bytes = password.as_bytes();
    &bytes[..bytes.len().min(MAX_PASSWORD_BYTES)]
}
