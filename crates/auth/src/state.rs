//! Application state for auth.

use std::sync::Arc;

use patentcliff_core::storage::UserRepository;

use crate::config::AuthConfig;

/// Shared state for auth handlers and extractors.
///
/// Parent application states expose it to the extractors by implementing
/// `FromRef<ParentState> for AuthState`.
#[derive(Clone)]
pub struct AuthState {
    pub users: Arc<dyn UserRepository>,
    pub config: Arc<AuthConfig>,
}

impl AuthState {
    pub fn new(users: Arc<dyn UserRepository>, config: AuthConfig) -> Self {
        Self {
            users,
            config: Arc::new(config),
        }
    }
}
