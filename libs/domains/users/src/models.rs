use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub use axum_helpers::Pagination;

/// User as stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub email: String,
    /// Argon2 PHC string, never exposed in API responses
    pub hashed_password: String,
    /// False once the user has been deactivated; never reset
    pub is_active: bool,
    pub api_token: String,
    pub created_at: DateTime<Utc>,
}

/// User as returned by the API
///
/// The token is included so a freshly registered client can authenticate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub is_active: bool,
    pub api_token: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_active: user.is_active,
            api_token: user.api_token,
        }
    }
}

/// Registration request body
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Row to insert: credentials already derived
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub hashed_password: String,
    pub api_token: String,
}
