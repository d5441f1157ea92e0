use chrono::{DateTime, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::error::Result;

// =============================================================================
// Passwords
// =============================================================================

/// Hash a password with bcrypt; the salt and cost are embedded in the result
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Check a password against a stored bcrypt hash
///
/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

// =============================================================================
// Bearer tokens
// =============================================================================

/// HS256 JWT claims: the user id as `sub`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: u64,
    exp: u64,
}

fn unix_seconds(at: i64) -> u64 {
    u64::try_from(at.max(0)).unwrap_or(0)
}

/// Issue a signed bearer token for a user, valid for `ttl_secs` from `issued_at`
pub fn issue_token(
    user_id: u64,
    issued_at: DateTime<Utc>,
    ttl_secs: i64,
    secret: &str,
) -> Result<String> {
    let claims = Claims {
        sub: user_id.to_string(),
        iat: unix_seconds(issued_at.timestamp()),
        exp: unix_seconds(issued_at.timestamp().saturating_add(ttl_secs)),
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Return the user id of a token that is well-formed, authentic and unexpired
pub fn verify_token(token: &str, secret: &str) -> Option<u64> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => data.claims.sub.parse().ok(),
        Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
            tracing::debug!("Rejected expired token");
            None
        }
        Err(e) => {
            tracing::warn!("Rejected bearer token: {}", e);
            None
        }
    }
}

// =============================================================================
// Shared secrets
// =============================================================================

/// Constant-time comparison of a presented key with the configured one
pub fn keys_match(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}
