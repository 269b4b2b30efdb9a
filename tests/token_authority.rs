//! End-to-end behaviour of the credential hasher and token authority as the
//! HTTP handlers use them: register a password, log in, call `/me`.

#![allow(clippy::unwrap_used)]

use lgd::auth::{
    now_unix_seconds, CredentialHasher, SigningSecret, TokenAuthority, TokenError,
    MAX_PASSWORD_BYTES,
};
use secrecy::SecretString;
use std::time::Duration;

const NOW: i64 = 1_700_000_000;

fn hasher() -> CredentialHasher {
    CredentialHasher::new(4).unwrap()
}

fn authority(secret: &str, ttl: Duration) -> TokenAuthority {
    let secret = SigningSecret::from_config(Some(SecretString::from(secret.to_string())));
    TokenAuthority::new(&secret, ttl)
}

#[test]
fn login_flow_with_injected_clock() {
    let hasher = hasher();
    let credential = hasher.hash("s3cret").unwrap();

    assert!(hasher.verify("s3cret", &credential));
    assert!(!hasher.verify("wrong", &credential));

    let authority = authority("change-me", Duration::from_secs(60 * 60));
    let token = authority
        .issue_at("bob@x.com", authority.ttl(), NOW)
        .unwrap();

    assert_eq!(authority.verify_at(&token, NOW).unwrap(), "bob@x.com");
    assert_eq!(authority.verify_at(&token, NOW + 3599).unwrap(), "bob@x.com");
    assert!(matches!(
        authority.verify_at(&token, NOW + 3600),
        Err(TokenError::Invalid)
    ));
}

#[test]
fn fresh_token_verifies_with_real_clock() {
    let authority = authority("change-me", Duration::from_secs(60 * 60));
    let token = authority.issue("bob@x.com").unwrap();

    assert_eq!(authority.verify(&token).unwrap(), "bob@x.com");
}

#[test]
fn short_lived_token_expires_with_real_clock() {
    let authority = authority("change-me", Duration::from_secs(60 * 60));
    let token = authority
        .issue_with_ttl("bob@x.com", Duration::from_secs(1))
        .unwrap();

    std::thread::sleep(Duration::from_secs(2));

    assert!(matches!(authority.verify(&token), Err(TokenError::Invalid)));
}

#[test]
fn token_from_other_secret_is_rejected() {
    let ours = authority("change-me", Duration::from_secs(60));
    let theirs = authority("something-else", Duration::from_secs(60));

    let token = theirs.issue_at("bob@x.com", Duration::from_secs(60), NOW).unwrap();

    assert!(matches!(ours.verify_at(&token, NOW), Err(TokenError::Invalid)));
}

#[test]
fn ephemeral_secrets_do_not_share_tokens() {
    let first = TokenAuthority::new(&SigningSecret::from_config(None), Duration::from_secs(60));
    let second = TokenAuthority::new(&SigningSecret::from_config(None), Duration::from_secs(60));

    assert!(first.is_ephemeral());
    assert!(second.is_ephemeral());

    let token = first.issue("bob@x.com").unwrap();

    assert!(first.verify(&token).is_ok());
    assert!(matches!(second.verify(&token), Err(TokenError::Invalid)));
}

#[test]
fn rejections_are_indistinguishable() {
    let authority = authority("change-me", Duration::from_secs(60));
    let expired = authority.issue_at("bob@x.com", Duration::from_secs(60), NOW).unwrap();
    let valid = authority.issue_at("bob@x.com", Duration::from_secs(60), NOW).unwrap();
    let middle = valid.len() / 2;
    let replacement = if &valid[middle..=middle] == "A" { "B" } else { "A" };
    let mut tampered = valid.clone();
    tampered.replace_range(middle..=middle, replacement);

    let now = NOW + 120;
    for token in [expired.as_str(), tampered.as_str(), "garbage", ""] {
        let err = authority.verify_at(token, now).unwrap_err();
        assert_eq!(err.to_string(), TokenError::Invalid.to_string());
    }
}

#[test]
fn passwords_differing_after_limit_are_equivalent() {
    let hasher = hasher();
    let prefix = "p".repeat(MAX_PASSWORD_BYTES);
    let credential = hasher.hash(&format!("{prefix}first-suffix")).unwrap();

    assert!(hasher.verify(&format!("{prefix}second-suffix"), &credential));
    assert!(hasher.verify(&prefix, &credential));
    assert!(!hasher.verify(&prefix[1..], &credential));
}

#[test]
fn now_is_recent() {
    assert!(now_unix_seconds() > NOW);
}
