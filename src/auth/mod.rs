//! Credential & Token Authority.
//!
//! Two independent primitives, both free of I/O and safe to share across
//! request handlers:
//!
//! - [`CredentialHasher`] turns a plaintext password into a salted bcrypt
//!   [`Credential`] and checks candidates against it.
//! - [`TokenAuthority`] mints HS256 bearer tokens binding a subject to an
//!   expiry and verifies them against the configured [`SigningSecret`].
//!
//! Tokens are stateless: there is no revocation, they simply expire.

mod error;
mod password;
mod secret;
mod token;

pub use error::{HashError, TokenError};
pub use password::{Credential, CredentialHasher, MAX_PASSWORD_BYTES};
pub use secret::{SigningSecret, EPHEMERAL_SECRET_BYTES};
pub use token::{now_unix_seconds, Claims, TokenAuthority, DEFAULT_TOKEN_TTL};
