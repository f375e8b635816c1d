//! Deactivation with ownership transfer, against a migrated database
//!
//! SQLite by default; the row-lock tests need Postgres and are ignored.

use domain_items::{CreateItem, ItemRepository, PgItemRepository, entity as item};
use domain_users::*;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use std::sync::Arc;
use test_utils::assertions::assert_all_owned_by;
use test_utils::{TestDataBuilder, TestDatabase};

async fn seed_items(db: &TestDatabase, owner_id: i32, count: usize) {
    let items = PgItemRepository::new(db.connection());
    for n in 0..count {
        items
            .create(owner_id, CreateItem::new(format!("item-{owner_id}-{n}"), None))
            .await
            .unwrap();
    }
}

async fn owners_of_all_items<C: ConnectionTrait>(conn: &C) -> Vec<i32> {
    item::Entity::find()
        .order_by_asc(item::Column::Id)
        .all(conn)
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.owner_id)
        .collect()
}

async fn item_count_of(conn: &DatabaseConnection, owner_id: i32) -> usize {
    item::Entity::find()
        .filter(item::Column::OwnerId.eq(owner_id))
        .all(conn)
        .await
        .unwrap()
        .len()
}

async fn is_active(conn: &DatabaseConnection, user_id: i32) -> bool {
    entity::Entity::find_by_id(user_id)
        .one(conn)
        .await
        .unwrap()
        .unwrap()
        .is_active
}

#[tokio::test]
async fn test_user_without_items_is_deactivated() {
    let db = TestDatabase::in_memory().await;
    let builder = TestDataBuilder::from_test_name("deactivate_no_items");
    let alice = db.seed_user(&builder.email("alice"), true).await;
    let bob = db.seed_user(&builder.email("bob"), true).await;
    seed_items(&db, alice, 1).await;

    let outcome = deactivate_and_reassign(&db.connection, bob).await.unwrap();

    assert_eq!(outcome.user.id, bob);
    assert!(!outcome.user.is_active);
    assert_eq!(outcome.reassignment, Reassignment::NothingOwned);
    assert!(!is_active(&db.connection, bob).await);
    assert!(is_active(&db.connection, alice).await);
    assert_eq!(owners_of_all_items(&db.connection).await, vec![alice]);
}

#[tokio::test]
async fn test_items_move_to_lowest_id_active_user() {
    let db = TestDatabase::in_memory().await;
    let builder = TestDataBuilder::from_test_name("deactivate_lowest_id");
    let first = db.seed_user(&builder.email("first"), true).await;
    let second = db.seed_user(&builder.email("second"), true).await;
    let target = db.seed_user(&builder.email("target"), true).await;
    seed_items(&db, target, 3).await;
    seed_items(&db, second, 1).await;

    let outcome = deactivate_and_reassign(&db.connection, target).await.unwrap();

    assert_eq!(
        outcome.reassignment,
        Reassignment::Transferred {
            new_owner_id: first,
            count: 3
        }
    );
    assert_eq!(item_count_of(&db.connection, target).await, 0);
    assert_eq!(item_count_of(&db.connection, first).await, 3);
    // Items of other users are untouched
    assert_eq!(item_count_of(&db.connection, second).await, 1);
}

#[tokio::test]
async fn test_first_user_deactivated_hands_item_to_second() {
    let db = TestDatabase::in_memory().await;
    let builder = TestDataBuilder::from_test_name("deactivate_first_to_second");
    let a = db.seed_user(&builder.email("a"), true).await;
    let b = db.seed_user(&builder.email("b"), true).await;
    assert_eq!((a, b), (1, 2));
    seed_items(&db, a, 1).await;

    let outcome = deactivate_and_reassign(&db.connection, 1).await.unwrap();

    assert!(!outcome.user.is_active);
    assert_eq!(owners_of_all_items(&db.connection).await, vec![2]);
}

#[tokio::test]
async fn test_inactive_users_are_skipped_as_replacement() {
    let db = TestDatabase::in_memory().await;
    let builder = TestDataBuilder::from_test_name("deactivate_skip_inactive");
    let retired = db.seed_user(&builder.email("retired"), false).await;
    let target = db.seed_user(&builder.email("target"), true).await;
    let heir = db.seed_user(&builder.email("heir"), true).await;
    seed_items(&db, target, 2).await;

    deactivate_and_reassign(&db.connection, target).await.unwrap();

    assert_eq!(item_count_of(&db.connection, retired).await, 0);
    assert_all_owned_by(
        &owners_of_all_items(&db.connection).await,
        heir,
        "skip inactive",
    );
}

#[tokio::test]
async fn test_items_stay_put_without_replacement() {
    let db = TestDatabase::in_memory().await;
    let builder = TestDataBuilder::from_test_name("deactivate_no_replacement");
    let retired = db.seed_user(&builder.email("retired"), false).await;
    let target = db.seed_user(&builder.email("target"), true).await;
    seed_items(&db, target, 2).await;

    let outcome = deactivate_and_reassign(&db.connection, target).await.unwrap();

    assert!(!outcome.user.is_active);
    assert_eq!(outcome.reassignment, Reassignment::NoReplacement { count: 2 });
    assert_all_owned_by(
        &owners_of_all_items(&db.connection).await,
        target,
        "no replacement",
    );
    assert!(!is_active(&db.connection, retired).await);
}

#[tokio::test]
async fn test_sole_user_deactivates_themselves() {
    let db = TestDatabase::in_memory().await;
    let builder = TestDataBuilder::from_test_name("deactivate_sole_user");
    let only = db.seed_user(&builder.email("only"), true).await;
    seed_items(&db, only, 1).await;

    let outcome = deactivate_and_reassign(&db.connection, only).await.unwrap();

    assert_eq!(outcome.reassignment, Reassignment::NoReplacement { count: 1 });
    assert_eq!(item_count_of(&db.connection, only).await, 1);
    assert!(!is_active(&db.connection, only).await);
}

#[tokio::test]
async fn test_second_deactivation_is_a_no_op_transfer() {
    let db = TestDatabase::in_memory().await;
    let builder = TestDataBuilder::from_test_name("deactivate_twice");
    let heir = db.seed_user(&builder.email("heir"), true).await;
    let target = db.seed_user(&builder.email("target"), true).await;
    seed_items(&db, target, 2).await;

    deactivate_and_reassign(&db.connection, target).await.unwrap();
    let again = deactivate_and_reassign(&db.connection, target).await.unwrap();

    assert!(!again.user.is_active);
    assert_eq!(again.reassignment, Reassignment::NothingOwned);
    assert_all_owned_by(&owners_of_all_items(&db.connection).await, heir, "twice");
}

#[tokio::test]
async fn test_retained_items_move_once_a_later_deactivation_finds_an_heir() {
    let db = TestDatabase::in_memory().await;
    let builder = TestDataBuilder::from_test_name("deactivate_late_heir");
    let target = db.seed_user(&builder.email("target"), true).await;
    seed_items(&db, target, 2).await;

    let first = deactivate_and_reassign(&db.connection, target).await.unwrap();
    assert_eq!(first.reassignment, Reassignment::NoReplacement { count: 2 });

    let heir = db.seed_user(&builder.email("heir"), true).await;
    let second = deactivate_and_reassign(&db.connection, target).await.unwrap();

    assert_eq!(
        second.reassignment,
        Reassignment::Transferred {
            new_owner_id: heir,
            count: 2
        }
    );
}

#[tokio::test]
async fn test_unknown_user_is_not_found_and_changes_nothing() {
    let db = TestDatabase::in_memory().await;
    let builder = TestDataBuilder::from_test_name("deactivate_unknown");
    let alice = db.seed_user(&builder.email("alice"), true).await;
    seed_items(&db, alice, 1).await;

    let result = deactivate_and_reassign(&db.connection, 9999).await;

    assert!(matches!(result, Err(UserError::NotFound(9999))));
    assert!(is_active(&db.connection, alice).await);
    assert_all_owned_by(&owners_of_all_items(&db.connection).await, alice, "unknown");
}

#[tokio::test]
async fn test_chain_of_deactivations() {
    // Three users; the middle one goes first, then the heir.
    let db = TestDatabase::in_memory().await;
    let builder = TestDataBuilder::from_test_name("deactivate_chain");
    let a = db.seed_user(&builder.email("a"), true).await;
    let b = db.seed_user(&builder.email("b"), true).await;
    let c = db.seed_user(&builder.email("c"), true).await;
    seed_items(&db, b, 2).await;
    seed_items(&db, a, 1).await;

    deactivate_and_reassign(&db.connection, b).await.unwrap();
    assert_eq!(item_count_of(&db.connection, a).await, 3);

    deactivate_and_reassign(&db.connection, a).await.unwrap();
    assert_all_owned_by(&owners_of_all_items(&db.connection).await, c, "chain");
    assert!(is_active(&db.connection, c).await);
}

#[tokio::test]
async fn test_caller_transaction_rollback_discards_everything() {
    let db = TestDatabase::in_memory().await;
    let builder = TestDataBuilder::from_test_name("deactivate_caller_rollback");
    let heir = db.seed_user(&builder.email("heir"), true).await;
    let target = db.seed_user(&builder.email("target"), true).await;
    seed_items(&db, target, 2).await;

    let txn = db.connection.begin().await.unwrap();
    let outcome = deactivate_and_reassign(&txn, target).await.unwrap();
    assert_eq!(
        outcome.reassignment,
        Reassignment::Transferred {
            new_owner_id: heir,
            count: 2
        }
    );
    assert_all_owned_by(&owners_of_all_items(&txn).await, heir, "inside txn");
    txn.rollback().await.unwrap();

    assert!(is_active(&db.connection, target).await);
    assert_all_owned_by(
        &owners_of_all_items(&db.connection).await,
        target,
        "after rollback",
    );
}

#[tokio::test]
async fn test_repository_rolls_back_when_transfer_fails() {
    let db = TestDatabase::in_memory().await;
    let builder = TestDataBuilder::from_test_name("deactivate_repo_rollback");
    db.seed_user(&builder.email("heir"), true).await;
    let target = db.seed_user(&builder.email("target"), true).await;

    // Break the item step after the flag flip has been issued
    db.connection
        .execute_unprepared("DROP TABLE items")
        .await
        .unwrap();

    let repo = PgUserRepository::new(db.connection());
    let result = repo.deactivate_and_reassign(target).await;

    assert!(matches!(result, Err(UserError::Storage(_))));
    assert!(is_active(&db.connection, target).await);
}

#[tokio::test]
async fn test_repository_commits_deactivation() {
    let db = TestDatabase::in_memory().await;
    let builder = TestDataBuilder::from_test_name("deactivate_repo_commit");
    let heir = db.seed_user(&builder.email("heir"), true).await;
    let target = db.seed_user(&builder.email("target"), true).await;
    seed_items(&db, target, 1).await;

    let repo = PgUserRepository::new(db.connection());
    let (user, reassignment) = repo.deactivate_and_reassign(target).await.unwrap();

    assert!(!user.is_active);
    assert_eq!(
        reassignment,
        Reassignment::Transferred {
            new_owner_id: heir,
            count: 1
        }
    );
    assert!(!is_active(&db.connection, target).await);
    assert_eq!(item_count_of(&db.connection, heir).await, 1);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_concurrent_deactivations_of_one_user_serialize_on_postgres() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("deactivate_concurrent_pg");
    let heir = db.seed_user(&builder.email("heir"), true).await;
    let target = db.seed_user(&builder.email("target"), true).await;
    seed_items(&db, target, 50).await;

    let repo = Arc::new(PgUserRepository::new(db.connection()));
    let (first, second) = futures::join!(
        repo.deactivate_and_reassign(target),
        repo.deactivate_and_reassign(target)
    );
    let (_, first) = first.unwrap();
    let (_, second) = second.unwrap();

    // Exactly one call moved the items; the other found nothing left
    let moved: Vec<_> = [first, second]
        .into_iter()
        .filter(|r| matches!(r, Reassignment::Transferred { .. }))
        .collect();
    assert_eq!(
        moved,
        vec![Reassignment::Transferred {
            new_owner_id: heir,
            count: 50
        }]
    );
    assert_all_owned_by(&owners_of_all_items(&db.connection).await, heir, "concurrent");
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_crossed_deactivations_complete_without_deadlock_on_postgres() {
    // Each target is the other's only candidate heir
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("deactivate_crossed_pg");
    let a = db.seed_user(&builder.email("a"), true).await;
    let b = db.seed_user(&builder.email("b"), true).await;
    seed_items(&db, a, 20).await;
    seed_items(&db, b, 20).await;

    let repo = Arc::new(PgUserRepository::new(db.connection()));
    let (first, second) = futures::join!(
        repo.deactivate_and_reassign(a),
        repo.deactivate_and_reassign(b)
    );
    let (user_a, _) = first.unwrap();
    let (user_b, _) = second.unwrap();

    assert!(!user_a.is_active);
    assert!(!user_b.is_active);
    assert!(!is_active(&db.connection, a).await);
    assert!(!is_active(&db.connection, b).await);

    // Items may be swapped or gathered on one side, but none are lost
    let owners = owners_of_all_items(&db.connection).await;
    assert_eq!(owners.len(), 40);
    assert!(owners.iter().all(|owner| *owner == a || *owner == b));
}
