use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    PrimaryKeyTrait, QueryOrder, QuerySelect,
};
use std::marker::PhantomData;

/// Shared CRUD plumbing for SeaORM-backed repositories.
///
/// Domain repositories hold one of these per entity and add their own
/// queries on top through [`db`](Self::db).
#[derive(Debug, Clone)]
pub struct BaseRepository<E: EntityTrait> {
    db: DatabaseConnection,
    _entity: PhantomData<E>,
}

impl<E: EntityTrait> BaseRepository<E> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn find_by_id<T>(&self, id: T) -> Result<Option<E::Model>, DbErr>
    where
        T: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
    {
        E::find_by_id(id).one(&self.db).await
    }

    /// One page of rows ordered by `order_column` ascending.
    pub async fn find_page(
        &self,
        order_column: E::Column,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<E::Model>, DbErr> {
        E::find()
            .order_by_asc(order_column)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
    }

    pub async fn insert<A>(&self, model: A) -> Result<E::Model, DbErr>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        model.insert(&self.db).await
    }
}
