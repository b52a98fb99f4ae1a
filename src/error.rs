use crate::repositories::user_repository::RepositoryError;
use crate::services::user_service::UserServiceError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("User not found")]
    UserNotFound,

    #[error("Email already registered")]
    Conflict,

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::MissingFields(_)
            | UserServiceError::InvalidEmail
            | UserServiceError::WeakPassword => AppError::Validation(err.to_string()),
            UserServiceError::UserNotFound => AppError::UserNotFound,
            UserServiceError::EmailTaken => AppError::Conflict,
            UserServiceError::HashingError(msg) => AppError::Internal(msg),
            UserServiceError::RepositoryError(RepositoryError::Database(e)) => {
                AppError::Database(e)
            }
            UserServiceError::RepositoryError(RepositoryError::NotFound) => AppError::UserNotFound,
            UserServiceError::RepositoryError(RepositoryError::AlreadyExists) => {
                AppError::Conflict
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "User not found".to_string()),
            AppError::Conflict => (StatusCode::CONFLICT, "Email already registered".to_string()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
