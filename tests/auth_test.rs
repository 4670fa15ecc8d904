//! Integration test for host token validation.
//!
//! Tokens are minted locally with the same HS256 secret the server would
//! use, then validated through `validate_token`. No running server or
//! database is needed.
//!
//! Run with: `cargo test --test auth_test`
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

use openmic_queue::auth::jwt::{HOST_SUBJECT, HostClaims, issue_token, validate_token};

/// A fake secret for testing, never the real one.
const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

/// Helper: mint a token with arbitrary claims signed with the test secret.
fn mint_token(sub: &str, exp_offset_secs: i64) -> String {
    let now = Utc::now().timestamp();

    let claims = HostClaims {
        sub: sub.to_string(),
        exp: (now + exp_offset_secs) as usize,
        iat: now as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("Failed to encode test JWT")
}

#[test]
fn test_issued_token_decodes_correctly() {
    let token = issue_token(TEST_SECRET, Duration::from_secs(3600)).expect("Token should sign");

    let claims = validate_token(&token, TEST_SECRET).expect("Token should be valid");

    assert_eq!(claims.sub, HOST_SUBJECT);
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[test]
fn test_expired_token_is_rejected() {
    // Expired 5 minutes ago, well past the 60s default leeway.
    let token = mint_token(HOST_SUBJECT, -300);

    let result = validate_token(&token, TEST_SECRET);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("ExpiredSignature"));
}

#[test]
fn test_wrong_secret_is_rejected() {
    let token = mint_token(HOST_SUBJECT, 3600);

    let result = validate_token(&token, "completely-wrong-secret-xxxxxxxxxxxxxxxxxxx");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("InvalidSignature"));
}

#[test]
fn test_foreign_subject_is_rejected() {
    let token = mint_token("performer", 3600);

    let result = validate_token(&token, TEST_SECRET);
    assert!(result.is_err());
}

#[test]
fn test_garbage_token_is_rejected() {
    let result = validate_token("not.a.valid.jwt", TEST_SECRET);
    assert!(result.is_err());
}
