//! Axum extractors for authentication.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use patentcliff_core::auth::{AuthError as CoreError, User};

use crate::{error::AuthError, token::verify_token, AuthState};

/// Extractor for the authenticated user.
///
/// Rejects with 401 when no bearer token is sent, 403 when the token does
/// not verify and 404 when the user no longer exists.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let token = bearer_token(parts).ok_or(CoreError::MissingToken)?;
        let claims = verify_token(token, &auth_state.config)?;
        let user_id = claims.user_id().ok_or(CoreError::InvalidToken)?;

        let user = auth_state
            .users
            .get_user(user_id)
            .await
            .map_err(|e| CoreError::Storage(e.to_string()))?
            .ok_or(CoreError::UserNotFound)?;

        Ok(CurrentUser(user))
    }
}

/// Extractor for an authenticated admin. Returns 403 for other roles.
pub struct AdminUser(pub User);

impl<S> FromRequestParts<S> for AdminUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            tracing::warn!(user_id = user.id, "Non-admin user denied admin route");
            return Err(CoreError::Forbidden.into());
        }

        Ok(AdminUser(user))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
