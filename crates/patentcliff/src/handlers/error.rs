use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use patentcliff_core::storage::{repository_error_to_status_code, RepositoryError};

/// Request errors raised by the handlers themselves.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

/// Application error type that wraps `anyhow::Error`.
///
/// Renders as `{"error": "..."}`. Repository and request errors keep their
/// status code; server-side failures hide their detail from the client.
pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_code(&self) -> StatusCode {
        if let Some(api_error) = self.0.downcast_ref::<ApiError>() {
            api_error.status_code()
        } else if let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() {
            let code = repository_error_to_status_code(repo_error);
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let message = if status_code.is_server_error() {
            tracing::error!(error = %self.0, status = %status_code, "Request failed");
            "Internal server error".to_string()
        } else {
            tracing::warn!(error = %self.0, status = %status_code, "API error");
            self.0.to_string()
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
