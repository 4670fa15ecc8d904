use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Subject stored in every host token.
pub const HOST_SUBJECT: &str = "host";

/// Claims of a host session token.
///
/// The host gate has a single role, so the subject is always [`HOST_SUBJECT`].
#[derive(Debug, Serialize, Deserialize)]
pub struct HostClaims {
    pub sub: String,
    /// Token expiration (Unix timestamp).
    pub exp: usize,
    /// Token issued-at (Unix timestamp).
    pub iat: usize,
}

/// Sign a new host token valid for `ttl`.
pub fn issue_token(secret: &str, ttl: Duration) -> Result<String, String> {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = HostClaims {
        sub: HOST_SUBJECT.to_string(),
        exp: now + ttl.as_secs() as usize,
        iat: now,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| format!("Failed to sign host token: {e}"))
}

/// Validate a host token and return the decoded claims.
pub fn validate_token(token: &str, secret: &str) -> Result<HostClaims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;

    let data = decode::<HostClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| format!("Token validation failed: {e}"))?;

    if data.claims.sub != HOST_SUBJECT {
        return Err("Token was not issued to the host".to_string());
    }

    Ok(data.claims)
}
