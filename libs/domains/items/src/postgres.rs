use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    SqlErr,
};

use crate::{
    entity,
    error::{ItemError, ItemResult},
    models::{CreateItem, Item, Pagination},
    repository::ItemRepository,
};

/// SeaORM implementation of [`ItemRepository`].
///
/// Works on any backend SeaORM supports; production runs it on PostgreSQL.
pub struct PgItemRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgItemRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

fn map_insert_error(owner_id: i32, err: DbErr) -> ItemError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => ItemError::OwnerNotFound(owner_id),
        _ => ItemError::Storage(err),
    }
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    #[tracing::instrument(skip(self, input))]
    async fn create(&self, owner_id: i32, input: CreateItem) -> ItemResult<Item> {
        let model = self
            .base
            .insert(entity::ActiveModel::for_owner(owner_id, input))
            .await
            .map_err(|e| map_insert_error(owner_id, e))?;

        tracing::info!(item_id = model.id, owner_id, "Created item");
        Ok(model.into())
    }

    async fn list(&self, page: Pagination) -> ItemResult<Vec<Item>> {
        let models = self
            .base
            .find_page(entity::Column::Id, page.offset(), page.limit())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_by_owner(&self, owner_id: i32, page: Pagination) -> ItemResult<Vec<Item>> {
        let models = entity::Entity::find()
            .filter(entity::Column::OwnerId.eq(owner_id))
            .order_by_asc(entity::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(self.base.db())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}
