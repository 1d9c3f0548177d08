use std::{env, time::Duration};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path to SQLite database file (default: "data/database.db")
    pub database_path: String,
    /// CSV dataset imported by `patentcliff import` (default: "data/master_dataset.csv")
    pub dataset_path: String,
    /// Per-request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DATABASE_PATH` - SQLite database path (default: "data/database.db")
    /// - `DATASET_PATH` - CSV dataset path (default: "data/master_dataset.csv")
    /// - `REQUEST_TIMEOUT_SECONDS` - Request timeout (default: 10)
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            database_path: var("DATABASE_PATH")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "data/database.db".to_string()),
            dataset_path: var("DATASET_PATH")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "data/master_dataset.csv".to_string()),
            request_timeout_seconds: var("REQUEST_TIMEOUT_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
