use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ItemError, ItemResult};
use crate::models::{CreateItem, Item, Pagination};
use crate::repository::ItemRepository;

/// Service layer for Item business logic
pub struct ItemService<R: ItemRepository> {
    repository: Arc<R>,
}

// Manual impl: derive would require `R: Clone`
impl<R: ItemRepository> Clone for ItemService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ItemRepository> ItemService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create an item owned by `owner_id`
    #[instrument(skip(self, input))]
    pub async fn create_item_for_user(&self, owner_id: i32, input: CreateItem) -> ItemResult<Item> {
        input
            .validate()
            .map_err(|e| ItemError::Validation(e.to_string()))?;

        self.repository.create(owner_id, input).await
    }

    pub async fn list_items(&self, page: Pagination) -> ItemResult<Vec<Item>> {
        self.repository.list(page).await
    }

    pub async fn list_items_for_owner(
        &self,
        owner_id: i32,
        page: Pagination,
    ) -> ItemResult<Vec<Item>> {
        self.repository.list_by_owner(owner_id, page).await
    }
}
