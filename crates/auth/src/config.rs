use std::time::Duration;

/// Secret used when `JWT_SECRET` is unset. Only suitable for local development.
const DEV_JWT_SECRET: &str = "patentcliff-dev-secret-change-me";

/// Complete auth configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub min_password_length: usize,
}

impl AuthConfig {
    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `JWT_SECRET`: HMAC secret for signing tokens (default: a development secret)
    /// - `JWT_TTL_DAYS`: Token lifetime in days (default: 7)
    /// - `MIN_PASSWORD_LENGTH`: Minimum password length (default: 6)
    pub fn from_env() -> Self {
        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET not set, using the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let token_ttl = std::env::var("JWT_TTL_DAYS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(|days| Duration::from_secs(days * 24 * 60 * 60))
            .unwrap_or(Duration::from_secs(7 * 24 * 60 * 60));

        let min_password_length = std::env::var("MIN_PASSWORD_LENGTH")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(6);

        Self {
            jwt_secret,
            token_ttl,
            min_password_length,
        }
    }

    /// Configuration with a fixed secret, for tests.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: secret.into(),
            token_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            min_password_length: 6,
        }
    }

    /// Token lifetime as a chrono duration.
    pub fn token_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.token_ttl).unwrap_or_else(|_| chrono::Duration::days(7))
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
