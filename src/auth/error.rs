use thiserror::Error;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("invalid bcrypt cost: {0} (expected 4..=31)")]
    InvalidCost(u32),
    #[error("bcrypt error")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

/// Token failures.
///
/// Every verification failure collapses into `Invalid`: callers only learn
/// that the token was rejected, never why. `EmptySubject` is only returned
/// when issuing.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token")]
    Invalid,
    #[error("token subject must not be empty")]
    EmptySubject,
    #[error("failed to encode token")]
    Encode(#[source] jsonwebtoken::errors::Error),
}
