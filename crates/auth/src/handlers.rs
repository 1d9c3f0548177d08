//! HTTP handlers for auth routes.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use patentcliff_core::auth::{
    email_to_name, normalize_email, validate_email, validate_password, AuthError as CoreError,
    NewUser, Role, User,
};
use patentcliff_core::serde::deserialize_optional_string;
use patentcliff_core::storage::RepositoryError;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::extractors::{AdminUser, CurrentUser};
use crate::password::{hash_password, verify_password};
use crate::token::issue_token;
use crate::AuthState;

/// Registration payload.
///
/// Accepts either a single `name` or `firstName`/`lastName`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, alias = "firstName", deserialize_with = "deserialize_optional_string")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastName", deserialize_with = "deserialize_optional_string")]
    pub last_name: Option<String>,
}

impl RegisterRequest {
    fn display_name(&self, email: &str) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if parts.is_empty() {
            email_to_name(email)
        } else {
            parts.join(" ")
        }
    }
}

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Token plus the user it was issued for.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Creates the auth router.
///
/// Routes (relative to where the router is nested):
/// - `POST /register` - Create an account and return a token
/// - `POST /login` - Exchange credentials for a token
/// - `GET /me` - Current authenticated user
/// - `GET /users` - All users (admin only)
pub fn auth_routes() -> Router<AuthState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/users", get(list_users))
}

async fn register(
    State(state): State<AuthState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), AuthError> {
    let Json(payload) = payload.map_err(body_error)?;
    let (Some(raw_email), Some(password)) = (
        payload.email.as_deref(),
        payload.password.clone().filter(|p| !p.is_empty()),
    ) else {
        return Err(CoreError::MissingCredentials.into());
    };

    let email = normalize_email(raw_email);
    validate_email(&email)?;
    validate_password(&password, state.config.min_password_length)?;

    if state
        .users
        .get_user_by_email(&email)
        .await
        .map_err(storage_error)?
        .is_some()
    {
        return Err(CoreError::EmailTaken.into());
    }

    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AuthError::Task(e.to_string()))??;

    let new_user = NewUser {
        name: payload.display_name(&email),
        email,
        password_hash,
        role: Role::User,
        created_at: Utc::now(),
    };

    let user = state
        .users
        .create_user(&new_user)
        .await
        .map_err(|e| match e {
            RepositoryError::AlreadyExists { .. } => AuthError::from(CoreError::EmailTaken),
            other => storage_error(other),
        })?;

    let token = issue_token(&user, &state.config)?;

    tracing::info!(user_id = user.id, email = %user.email, "Registered new user");

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

async fn login(
    State(state): State<AuthState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AuthError> {
    let Json(payload) = payload.map_err(body_error)?;
    let (Some(raw_email), Some(password)) = (
        payload.email.as_deref(),
        payload.password.clone().filter(|p| !p.is_empty()),
    ) else {
        return Err(CoreError::MissingCredentials.into());
    };

    let credentials = state
        .users
        .get_user_by_email(&normalize_email(raw_email))
        .await
        .map_err(storage_error)?
        .ok_or(CoreError::InvalidCredentials)?;

    let hash = credentials.password_hash;
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AuthError::Task(e.to_string()))??;

    if !matches {
        tracing::warn!(user_id = credentials.user.id, "Failed login attempt");
        return Err(CoreError::InvalidCredentials.into());
    }

    let token = issue_token(&credentials.user, &state.config)?;

    Ok(Json(AuthResponse {
        token,
        user: credentials.user,
    }))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

async fn list_users(
    State(state): State<AuthState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<User>>, AuthError> {
    let users = state.users.list_users().await.map_err(storage_error)?;
    Ok(Json(users))
}

fn body_error(rejection: JsonRejection) -> AuthError {
    tracing::debug!(error = %rejection.body_text(), "Rejected auth request body");
    AuthError::Body(rejection.body_text())
}

fn storage_error(err: RepositoryError) -> AuthError {
    AuthError::Core(CoreError::Storage(err.to_string()))
}
