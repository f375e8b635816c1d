use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, SqlErr, TransactionTrait,
};

use crate::{
    deactivation::{self, Reassignment},
    entity,
    error::{UserError, UserResult},
    models::{NewUser, Pagination, User},
    repository::UserRepository,
};

/// SeaORM implementation of [`UserRepository`].
pub struct PgUserRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

fn map_insert_error(email: &str, err: DbErr) -> UserError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => UserError::DuplicateEmail(email.to_string()),
        _ => UserError::Storage(err),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[tracing::instrument(skip(self, input), fields(email = %input.email))]
    async fn create(&self, input: NewUser) -> UserResult<User> {
        let email = input.email.clone();
        let model = self
            .base
            .insert(entity::ActiveModel::from(input))
            .await
            .map_err(|e| map_insert_error(&email, e))?;

        tracing::info!(user_id = model.id, "Created user");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i32) -> UserResult<Option<User>> {
        let model = self.base.find_by_id(id).await?;
        Ok(model.map(Into::into))
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .one(self.base.db())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn get_by_api_token(&self, token: &str) -> UserResult<Option<User>> {
        let model = entity::Entity::find()
            .filter(entity::Column::ApiToken.eq(token))
            .one(self.base.db())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn list(&self, page: Pagination) -> UserResult<Vec<User>> {
        let models = self
            .base
            .find_page(entity::Column::Id, page.offset(), page.limit())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn deactivate_and_reassign(&self, id: i32) -> UserResult<(User, Reassignment)> {
        let txn = self.base.db().begin().await?;

        match deactivation::deactivate_and_reassign(&txn, id).await {
            Ok(outcome) => {
                txn.commit().await?;
                Ok((outcome.user.into(), outcome.reassignment))
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::warn!(error = %rollback_err, "Rollback after failed deactivation failed");
                }
                Err(err)
            }
        }
    }
}
