use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use book_lib::BookRepositoryError;

#[derive(Debug)]
pub enum ApiError {
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // details stay in the logs
            ApiError::Internal(detail) => {
                tracing::debug!(detail = %detail, "responding with internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

impl From<BookRepositoryError> for ApiError {
    fn from(err: BookRepositoryError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Converts a repository error to an ApiError, logging it.
pub fn handle_repository_error(err: BookRepositoryError, operation: &str) -> ApiError {
    tracing::error!(error = %err, operation = %operation, "repository error");
    ApiError::from(err)
}
