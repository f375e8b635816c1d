//! Soft-delete of a user with transfer of everything they own.
//!
//! A deactivated user keeps its row (`is_active = false`) so history stays
//! attributable. Its items move, all together, to the active user with the
//! lowest id. When no such user exists the items stay where they are.
//!
//! [`deactivate_and_reassign`] takes any [`ConnectionTrait`], so the caller
//! decides the unit of work. [`PgUserRepository`](crate::PgUserRepository)
//! runs it inside a transaction; passing a bare connection gives no
//! atomicity between the flag flip and the transfer.

use domain_items::entity as item;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tracing::instrument;

use crate::entity as user;
use crate::error::{UserError, UserResult};

/// Where the deactivated user's items went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reassignment {
    /// The user owned nothing
    NothingOwned,
    /// `count` items now belong to `new_owner_id`
    Transferred { new_owner_id: i32, count: u64 },
    /// No other active user; `count` items remain with the deactivated owner
    NoReplacement { count: u64 },
}

/// Result of a deactivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deactivation {
    pub user: user::Model,
    pub reassignment: Reassignment,
}

/// Mark `target_user_id` inactive and hand its items to a replacement owner.
///
/// The target row is read with `FOR NO KEY UPDATE` where the backend supports
/// it, so two deactivations of the same user serialize. The lock does not
/// block the `FOR KEY SHARE` taken by the `items.owner_id` foreign key check,
/// so deactivating two users at once, each picked as the other's replacement,
/// completes instead of deadlocking; both users end up inactive and their
/// items stay with one or the other. Deactivating an already inactive user is allowed and
/// re-runs the transfer.
#[instrument(skip(conn))]
pub async fn deactivate_and_reassign<C>(conn: &C, target_user_id: i32) -> UserResult<Deactivation>
where
    C: ConnectionTrait,
{
    let target = user::Entity::find_by_id(target_user_id)
        .lock(LockType::NoKeyUpdate)
        .one(conn)
        .await?
        .ok_or(UserError::NotFound(target_user_id))?;

    let mut active = target.into_active_model();
    active.is_active = Set(false);
    let deactivated = active.update(conn).await?;

    let owned = item::Entity::find()
        .filter(item::Column::OwnerId.eq(target_user_id))
        .count(conn)
        .await?;

    if owned == 0 {
        tracing::info!(user_id = target_user_id, "Deactivated user with no items");
        return Ok(Deactivation {
            user: deactivated,
            reassignment: Reassignment::NothingOwned,
        });
    }

    let replacement = user::Entity::find()
        .filter(user::Column::IsActive.eq(true))
        .filter(user::Column::Id.ne(target_user_id))
        .order_by_asc(user::Column::Id)
        .one(conn)
        .await?;

    let Some(replacement) = replacement else {
        tracing::warn!(
            user_id = target_user_id,
            items = owned,
            "No active user to take over items; ownership unchanged"
        );
        return Ok(Deactivation {
            user: deactivated,
            reassignment: Reassignment::NoReplacement { count: owned },
        });
    };

    let moved = item::Entity::update_many()
        .col_expr(item::Column::OwnerId, Expr::value(replacement.id))
        .filter(item::Column::OwnerId.eq(target_user_id))
        .exec(conn)
        .await?;

    tracing::info!(
        user_id = target_user_id,
        new_owner_id = replacement.id,
        items = moved.rows_affected,
        "Deactivated user and reassigned items"
    );

    Ok(Deactivation {
        user: deactivated,
        reassignment: Reassignment::Transferred {
            new_owner_id: replacement.id,
            count: moved.rows_affected,
        },
    })
}
