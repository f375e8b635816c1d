//! Repository tests for the items domain against a migrated in-memory database.

use domain_items::*;
use test_utils::{TestDataBuilder, TestDatabase, assertions::assert_all_owned_by};

#[tokio::test]
async fn test_create_and_list_items() {
    let db = TestDatabase::in_memory().await;
    let builder = TestDataBuilder::from_test_name("create_and_list_items");
    let owner = db.seed_user(&builder.email("owner"), true).await;

    let repo = PgItemRepository::new(db.connection());
    let first = repo
        .create(owner, CreateItem::new("Laptop", Some("14 inch".to_string())))
        .await
        .unwrap();
    let second = repo.create(owner, CreateItem::new("Mouse", None)).await.unwrap();

    assert!(second.id > first.id);
    assert_eq!(first.owner_id, owner);
    assert_eq!(first.description.as_deref(), Some("14 inch"));

    let items = repo.list(Pagination::default()).await.unwrap();
    assert_eq!(items, vec![first, second]);
}

#[tokio::test]
async fn test_create_for_unknown_owner_is_owner_not_found() {
    let db = TestDatabase::in_memory().await;
    let repo = PgItemRepository::new(db.connection());

    let result = repo.create(404, CreateItem::new("Orphan", None)).await;

    assert!(matches!(result, Err(ItemError::OwnerNotFound(404))));
    assert!(repo.list(Pagination::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_by_owner_filters_and_paginates() {
    let db = TestDatabase::in_memory().await;
    let builder = TestDataBuilder::from_test_name("list_by_owner");
    let alice = db.seed_user(&builder.email("alice"), true).await;
    let bob = db.seed_user(&builder.email("bob"), true).await;

    let repo = PgItemRepository::new(db.connection());
    for n in 0..4 {
        repo.create(alice, CreateItem::new(format!("a{n}"), None))
            .await
            .unwrap();
        repo.create(bob, CreateItem::new(format!("b{n}"), None))
            .await
            .unwrap();
    }

    let alice_items = repo
        .list_by_owner(alice, Pagination::default())
        .await
        .unwrap();
    assert_eq!(alice_items.len(), 4);
    let owners: Vec<i32> = alice_items.iter().map(|i| i.owner_id).collect();
    assert_all_owned_by(&owners, alice, "alice's items");

    let page = repo
        .list_by_owner(bob, Pagination::new(1, 2))
        .await
        .unwrap();
    let titles: Vec<_> = page.into_iter().map(|i| i.title).collect();
    assert_eq!(titles, vec!["b1", "b2"]);
}

#[tokio::test]
async fn test_zero_limit_is_clamped_to_one() {
    let db = TestDatabase::in_memory().await;
    let builder = TestDataBuilder::from_test_name("zero_limit");
    let owner = db.seed_user(&builder.email("owner"), true).await;

    let repo = PgItemRepository::new(db.connection());
    repo.create(owner, CreateItem::new("one", None)).await.unwrap();
    repo.create(owner, CreateItem::new("two", None)).await.unwrap();

    let items = repo.list(Pagination::new(0, 0)).await.unwrap();
    assert_eq!(items.len(), 1);
}
