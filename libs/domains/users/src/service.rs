use async_trait::async_trait;
use axum_helpers::{ApiTokenResolver, AppError, AuthenticatedUser};
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::credentials::{generate_api_token, hash_password};
use crate::deactivation::Reassignment;
use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, NewUser, Pagination, User, UserResponse};
use crate::repository::UserRepository;

/// Service layer for User business logic
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

// Manual impl: derive would require `R: Clone`
impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Register a new active user with a freshly issued API token
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: CreateUser) -> UserResult<UserResponse> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        if self.repository.get_by_email(&input.email).await?.is_some() {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let new_user = NewUser {
            hashed_password: hash_password(&input.password)?,
            api_token: generate_api_token()?,
            email: input.email,
        };

        let user = self.repository.create(new_user).await?;
        Ok(user.into())
    }

    pub async fn list_users(&self, page: Pagination) -> UserResult<Vec<UserResponse>> {
        let users = self.repository.list(page).await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    pub async fn get_user(&self, id: i32) -> UserResult<UserResponse> {
        self.repository
            .get_by_id(id)
            .await?
            .map(Into::into)
            .ok_or(UserError::NotFound(id))
    }

    /// Soft-delete `id`, moving its items to the lowest-id active user
    #[instrument(skip(self))]
    pub async fn deactivate_user(&self, id: i32) -> UserResult<(UserResponse, Reassignment)> {
        let (user, reassignment) = self.repository.deactivate_and_reassign(id).await?;
        Ok((user.into(), reassignment))
    }

    /// User owning `token`, active or not
    pub async fn resolve_token(&self, token: &str) -> UserResult<Option<User>> {
        self.repository.get_by_api_token(token).await
    }
}

#[async_trait]
impl<R: UserRepository + 'static> ApiTokenResolver for UserService<R> {
    async fn resolve(&self, token: &str) -> Result<Option<AuthenticatedUser>, AppError> {
        let user = self.resolve_token(token).await?;

        Ok(user.map(|user| AuthenticatedUser {
            id: user.id,
            email: user.email,
            is_active: user.is_active,
        }))
    }
}
