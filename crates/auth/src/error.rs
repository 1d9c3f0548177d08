use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Auth errors for the patentcliff_auth crate.
///
/// Wraps the core `AuthError` and adds variants for failures that only
/// happen at the I/O boundary.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Error from the core auth module (validation, credentials, tokens).
    #[error(transparent)]
    Core(#[from] patentcliff_core::auth::AuthError),

    /// Request body missing, not JSON, or of the wrong shape.
    #[error("Invalid request body: {0}")]
    Body(String),

    /// Blocking task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        use patentcliff_core::auth::AuthError as CoreError;

        match self {
            AuthError::Core(core_err) => match core_err {
                CoreError::MissingCredentials
                | CoreError::InvalidEmail
                | CoreError::PasswordTooShort { .. } => StatusCode::BAD_REQUEST,
                CoreError::EmailTaken => StatusCode::CONFLICT,
                CoreError::InvalidCredentials | CoreError::MissingToken => StatusCode::UNAUTHORIZED,
                CoreError::InvalidToken | CoreError::Forbidden => StatusCode::FORBIDDEN,
                CoreError::UserNotFound => StatusCode::NOT_FOUND,
                CoreError::Storage(_) | CoreError::Token(_) | CoreError::Hashing(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AuthError::Body(_) => StatusCode::BAD_REQUEST,
            AuthError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status.is_server_error() {
            tracing::error!("Auth error: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patentcliff_core::auth::AuthError as CoreError;

    #[test]
    fn test_validation_errors_are_bad_request() {
        let err = AuthError::from(CoreError::PasswordTooShort { min: 6 });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_token_is_unauthorized_and_bad_token_forbidden() {
        assert_eq!(
            AuthError::from(CoreError::MissingToken).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::from(CoreError::InvalidToken).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_duplicate_email_is_conflict() {
        assert_eq!(
            AuthError::from(CoreError::EmailTaken).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_storage_error_hides_detail() {
        let response = AuthError::from(CoreError::Storage("disk I/O error".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
