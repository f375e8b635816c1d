use async_trait::async_trait;

use crate::deactivation::Reassignment;
use crate::error::UserResult;
use crate::models::{NewUser, Pagination, User};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert an active user. Fails with `DuplicateEmail` on a taken address.
    async fn create(&self, input: NewUser) -> UserResult<User>;

    async fn get_by_id(&self, id: i32) -> UserResult<Option<User>>;

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;

    async fn get_by_api_token(&self, token: &str) -> UserResult<Option<User>>;

    /// Users ordered by id
    async fn list(&self, page: Pagination) -> UserResult<Vec<User>>;

    /// Deactivate `id` and transfer its items, atomically.
    async fn deactivate_and_reassign(&self, id: i32) -> UserResult<(User, Reassignment)>;
}
