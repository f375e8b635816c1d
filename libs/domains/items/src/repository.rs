use async_trait::async_trait;

use crate::error::ItemResult;
use crate::models::{CreateItem, Item, Pagination};

/// Repository trait for Item persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert an item owned by `owner_id`.
    ///
    /// Fails with `OwnerNotFound` when no user has that id.
    async fn create(&self, owner_id: i32, input: CreateItem) -> ItemResult<Item>;

    /// All items, ordered by id
    async fn list(&self, page: Pagination) -> ItemResult<Vec<Item>>;

    /// Items owned by `owner_id`, ordered by id
    async fn list_by_owner(&self, owner_id: i32, page: Pagination) -> ItemResult<Vec<Item>>;
}
