//! JWT creation and verification.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use patentcliff_core::auth::{build_claims, AuthError, Claims, User};

use crate::config::AuthConfig;

/// Issue a signed HS256 token for `user`.
pub fn issue_token(user: &User, config: &AuthConfig) -> Result<String, AuthError> {
    let claims = build_claims(user, Utc::now(), config.token_ttl_chrono());
    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());

    encode(&Header::default(), &claims, &key).map_err(|e| AuthError::Token(format!("create JWT: {e}")))
}

/// Verify a token's signature and expiry and return its claims.
///
/// Any verification failure is reported as [`AuthError::InvalidToken`].
pub fn verify_token(token: &str, config: &AuthConfig) -> Result<Claims, AuthError> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

    decode::<Claims>(token, &key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected token");
            AuthError::InvalidToken
        })
}
