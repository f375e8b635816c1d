//! Handler tests for the users domain
//!
//! The caller identity is injected as a request extension, standing in for
//! the API-token middleware that the app layers on top.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::{Extension, Router};
use axum_helpers::AuthenticatedUser;
use domain_items::{CreateItem, ItemRepository, PgItemRepository};
use domain_users::*;
use http_body_util::BodyExt;
use serde_json::json;
use test_utils::{TestDataBuilder, TestDatabase};
use tower::ServiceExt;

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn caller(id: i32) -> AuthenticatedUser {
    AuthenticatedUser {
        id,
        email: format!("caller-{id}@example.test"),
        is_active: true,
    }
}

fn app(db: &TestDatabase) -> Router {
    handlers::router(UserService::new(PgUserRepository::new(db.connection())))
}

fn register_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_register_is_public_and_returns_token() {
    let db = TestDatabase::in_memory().await;

    let response = app(&db)
        .oneshot(register_request(
            json!({"email": "alice@example.com", "password": "secret"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = json_body(response.into_body()).await;
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["is_active"], true);
    assert_eq!(body["api_token"].as_str().unwrap().len(), 64);
    assert!(body.get("hashed_password").is_none());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let db = TestDatabase::in_memory().await;
    let payload = json!({"email": "dup@example.com", "password": "secret"});

    let first = app(&db)
        .oneshot(register_request(payload.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app(&db).oneshot(register_request(payload)).await.unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = json_body(second.into_body()).await;
    assert_eq!(body["error"], "CONFLICT");
    assert_eq!(body["message"], "Email already registered");
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let db = TestDatabase::in_memory().await;

    let response = app(&db)
        .oneshot(register_request(
            json!({"email": "not-an-email", "password": "secret"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["details"]["email"].is_array());
}

#[tokio::test]
async fn test_protected_routes_require_authentication() {
    let db = TestDatabase::in_memory().await;

    for (method, uri) in [("GET", "/users"), ("GET", "/users/1"), ("DELETE", "/users/1")] {
        let response = app(&db).oneshot(request(method, uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
    }
}

#[tokio::test]
async fn test_list_and_get_users() {
    let db = TestDatabase::in_memory().await;
    let builder = TestDataBuilder::from_test_name("handler_list_users");
    let alice = db.seed_user(&builder.email("alice"), true).await;
    let bob = db.seed_user(&builder.email("bob"), false).await;

    let list = app(&db)
        .layer(Extension(caller(alice)))
        .oneshot(request("GET", "/users?skip=0&limit=10"))
        .await
        .unwrap();
    assert_eq!(list.status(), StatusCode::OK);
    let users: Vec<UserResponse> = json_body(list.into_body()).await;
    let ids: Vec<_> = users.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![alice, bob]);

    let one = app(&db)
        .layer(Extension(caller(alice)))
        .oneshot(request("GET", &format!("/users/{bob}")))
        .await
        .unwrap();
    assert_eq!(one.status(), StatusCode::OK);
    let user: UserResponse = json_body(one.into_body()).await;
    assert!(!user.is_active);

    let missing = app(&db)
        .layer(Extension(caller(alice)))
        .oneshot(request("GET", "/users/9999"))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_deactivates_and_transfers_items() {
    let db = TestDatabase::in_memory().await;
    let builder = TestDataBuilder::from_test_name("handler_delete_user");
    let heir = db.seed_user(&builder.email("heir"), true).await;
    let target = db.seed_user(&builder.email("target"), true).await;

    let items = PgItemRepository::new(db.connection());
    items
        .create(target, CreateItem::new("Lamp", None))
        .await
        .unwrap();

    let response = app(&db)
        .layer(Extension(caller(heir)))
        .oneshot(request("DELETE", &format!("/users/{target}")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let user: UserResponse = json_body(response.into_body()).await;
    assert_eq!(user.id, target);
    assert!(!user.is_active);

    let inherited = items
        .list_by_owner(heir, Pagination::default())
        .await
        .unwrap();
    assert_eq!(inherited.len(), 1);
    assert_eq!(inherited[0].title, "Lamp");
}

#[tokio::test]
async fn test_delete_unknown_user_returns_404() {
    let db = TestDatabase::in_memory().await;
    let builder = TestDataBuilder::from_test_name("handler_delete_unknown");
    let me = db.seed_user(&builder.email("me"), true).await;

    let response = app(&db)
        .layer(Extension(caller(me)))
        .oneshot(request("DELETE", "/users/9999"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "User 9999 not found");
}
