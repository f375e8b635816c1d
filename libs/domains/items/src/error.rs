use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Owner not found: {0}")]
    OwnerNotFound(i32),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] DbErr),
}

pub type ItemResult<T> = Result<T, ItemError>;

/// Convert ItemError to AppError for standardized error responses
impl From<ItemError> for AppError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::OwnerNotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            ItemError::Validation(msg) => AppError::BadRequest(msg),
            ItemError::Storage(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for ItemError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
