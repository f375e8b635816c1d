use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AuditEvent, AuditOutcome, CurrentUser, ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, InternalServerErrorResponse, NotFoundResponse,
        UnauthorizedResponse,
    },
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ItemResult;
use crate::models::{CreateItem, Item, Pagination};
use crate::repository::ItemRepository;
use crate::service::ItemService;

pub const TAG: &str = "Items";

/// OpenAPI documentation for Items API
#[derive(OpenApi)]
#[openapi(
    paths(create_item_for_user, list_items, list_my_items),
    components(
        schemas(Item, CreateItem),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Item endpoints")
    )
)]
pub struct ApiDoc;

/// Create the items router
///
/// Routes carry their full paths so the router merges beside the users router.
pub fn router<R: ItemRepository + 'static>(service: ItemService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/users/{id}/items", post(create_item_for_user))
        .route("/items", get(list_items))
        .route("/me/items", get(list_my_items))
        .with_state(shared_service)
}

/// Create an item owned by the given user
#[utoipa::path(
    post,
    path = "/users/{id}/items",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Owner user ID")
    ),
    request_body = CreateItem,
    security(("api_token" = [])),
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_item_for_user<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    CurrentUser(caller): CurrentUser,
    Path(owner_id): Path<i32>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateItem>,
) -> ItemResult<impl IntoResponse> {
    let item = service.create_item_for_user(owner_id, input).await?;

    AuditEvent::new(
        Some(caller.id),
        "item.create",
        Some(format!("item:{}", item.id)),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .with_details(json!({ "owner_id": item.owner_id }))
    .log();

    Ok((StatusCode::CREATED, Json(item)))
}

/// List all items
#[utoipa::path(
    get,
    path = "/items",
    tag = TAG,
    params(Pagination),
    security(("api_token" = [])),
    responses(
        (status = 200, description = "Items ordered by id", body = Vec<Item>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_items<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    CurrentUser(_caller): CurrentUser,
    Query(page): Query<Pagination>,
) -> ItemResult<Json<Vec<Item>>> {
    let items = service.list_items(page).await?;
    Ok(Json(items))
}

/// List items owned by the caller
#[utoipa::path(
    get,
    path = "/me/items",
    tag = TAG,
    params(Pagination),
    security(("api_token" = [])),
    responses(
        (status = 200, description = "Caller's items ordered by id", body = Vec<Item>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_my_items<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    CurrentUser(caller): CurrentUser,
    Query(page): Query<Pagination>,
) -> ItemResult<Json<Vec<Item>>> {
    let items = service.list_items_for_owner(caller.id, page).await?;
    Ok(Json(items))
}
