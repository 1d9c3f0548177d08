//! Shared application state.
//!
//! Handlers see storage only through repository trait objects.

use std::{sync::Arc, time::Duration};

use patentcliff_auth::{AuthConfig, AuthState};
use patentcliff_core::drugs::DiseaseCatalog;
use patentcliff_core::storage::{DrugRepository, UserRepository};

use crate::storage::SqliteRepository;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Drug, product and patent queries.
    pub drugs: Arc<dyn DrugRepository>,
    /// Disease name to brand names.
    pub diseases: Arc<DiseaseCatalog>,
    /// Users, token settings.
    pub auth: AuthState,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(
        drugs: Arc<dyn DrugRepository>,
        users: Arc<dyn UserRepository>,
        auth_config: AuthConfig,
        request_timeout: Duration,
    ) -> Self {
        Self {
            drugs,
            diseases: Arc::new(DiseaseCatalog::default()),
            auth: AuthState::new(users, auth_config),
            request_timeout,
        }
    }

    /// State where one SQLite repository backs both drugs and users.
    pub fn with_sqlite(
        repo: SqliteRepository,
        auth_config: AuthConfig,
        request_timeout: Duration,
    ) -> Self {
        let repo = Arc::new(repo);
        Self::new(repo.clone(), repo, auth_config, request_timeout)
    }
}
