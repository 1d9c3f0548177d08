use chrono::{DateTime, Duration, Utc};

use super::{Claims, User};

/// Calculate token expiry from issue time and TTL.
pub fn calculate_expiry(issued_at: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    issued_at + ttl
}

/// Build JWT claims for `user`, issued at `now` and valid for `ttl`.
pub fn build_claims(user: &User, now: DateTime<Utc>, ttl: Duration) -> Claims {
    let expires_at = calculate_expiry(now, ttl);
    Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role,
        iat: now.timestamp().max(0) as usize,
        exp: expires_at.timestamp().max(0) as usize,
    }
}

/// Extract a display name from an email if no name was provided.
pub fn email_to_name(email: &str) -> String {
    match email.split('@').next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "User".to_string(),
    }
}
