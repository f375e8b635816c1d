use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub use axum_helpers::Pagination;

/// An item and its current owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    /// Id of the owning user
    pub owner_id: i32,
}

/// Request body for creating an item
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateItem {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateItem {
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
        }
    }
}
