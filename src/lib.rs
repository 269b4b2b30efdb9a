//! # LGD (Le Générateur Digital)
//!
//! Authentication backend for the business idea generator.
//!
//! ## Credential & Token Authority
//!
//! The [`auth`] module is the core: bcrypt password hashing and stateless HS256
//! bearer tokens. It performs no I/O and holds no global state; the signing
//! secret is configuration handed to [`auth::TokenAuthority`] at startup.
//!
//! - **Passwords:** only the first 72 bytes are significant. Verification never
//!   errors; every failure reads as a mismatch.
//! - **Tokens:** valid while the signature matches and the current time is
//!   strictly before `exp`. All rejections share one error kind.
//! - **Ephemeral secrets:** without a configured secret a random one is
//!   generated per process, so tokens do not survive restarts.
//!
//! ## HTTP
//!
//! The [`lgd`] module wires the authority into an axum server exposing
//! `/register`, `/token`, `/me` and `/health`.

pub mod auth;
pub mod cli;
pub mod lgd;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
