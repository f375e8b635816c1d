use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(i32),

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Storage error: {0}")]
    Storage(#[from] DbErr),
}

pub type UserResult<T> = Result<T, UserError>;

/// Convert UserError to AppError for standardized error responses
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            UserError::DuplicateEmail(_) => {
                AppError::Conflict("Email already registered".to_string())
            }
            UserError::Validation(msg) => AppError::BadRequest(msg),
            UserError::PasswordHash(msg) => {
                AppError::InternalServerError(format!("Password hashing failed: {}", msg))
            }
            UserError::Internal(msg) => AppError::InternalServerError(msg),
            UserError::Storage(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
