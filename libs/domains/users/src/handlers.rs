use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AuditEvent, AuditOutcome, CurrentUser, ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
        NotFoundResponse, UnauthorizedResponse,
    },
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::deactivation::Reassignment;
use crate::error::UserResult;
use crate::models::{CreateUser, Pagination, UserResponse};
use crate::repository::UserRepository;
use crate::service::UserService;

pub const TAG: &str = "Users";

/// OpenAPI documentation for Users API
#[derive(OpenApi)]
#[openapi(
    paths(register_user, list_users, get_user, deactivate_user),
    components(
        schemas(UserResponse, CreateUser),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            ConflictResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "User registration and deactivation")
    )
)]
pub struct ApiDoc;

/// Create the users router
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/users", get(list_users).post(register_user))
        .route("/users/{id}", get(get_user).delete(deactivate_user))
        .with_state(shared_service)
}

/// Register a new user
///
/// Public. The response carries the API token for subsequent requests.
#[utoipa::path(
    post,
    path = "/users",
    tag = TAG,
    request_body = CreateUser,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<impl IntoResponse> {
    let user = service.register(input).await?;

    AuditEvent::new(
        Some(user.id),
        "user.register",
        Some(format!("user:{}", user.id)),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .log();

    Ok((StatusCode::CREATED, Json(user)))
}

/// List users
#[utoipa::path(
    get,
    path = "/users",
    tag = TAG,
    params(Pagination),
    security(("api_token" = [])),
    responses(
        (status = 200, description = "Users ordered by id", body = Vec<UserResponse>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    CurrentUser(_caller): CurrentUser,
    Query(page): Query<Pagination>,
) -> UserResult<Json<Vec<UserResponse>>> {
    let users = service.list_users(page).await?;
    Ok(Json(users))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    security(("api_token" = [])),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    CurrentUser(_caller): CurrentUser,
    Path(id): Path<i32>,
) -> UserResult<Json<UserResponse>> {
    let user = service.get_user(id).await?;
    Ok(Json(user))
}

/// Deactivate a user
///
/// The user's items move to the active user with the lowest id. If there is
/// none, the items stay with the deactivated user.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    security(("api_token" = [])),
    responses(
        (status = 200, description = "User deactivated", body = UserResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn deactivate_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> UserResult<Json<UserResponse>> {
    let (user, reassignment) = service.deactivate_user(id).await?;

    let details = match reassignment {
        Reassignment::NothingOwned => json!({ "items_reassigned": 0 }),
        Reassignment::Transferred {
            new_owner_id,
            count,
        } => json!({ "items_reassigned": count, "new_owner_id": new_owner_id }),
        Reassignment::NoReplacement { count } => {
            json!({ "items_reassigned": 0, "items_retained": count })
        }
    };

    AuditEvent::new(
        Some(caller.id),
        "user.deactivate",
        Some(format!("user:{}", id)),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .with_details(details)
    .log();

    Ok(Json(user))
}
