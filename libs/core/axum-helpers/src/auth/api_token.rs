use crate::errors::AppError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Header carrying the caller's API token.
pub const API_TOKEN_HEADER: &str = "x-api-token";

const INVALID_TOKEN: &str = "Invalid API token";

/// Caller identity resolved from an API token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub email: String,
    pub is_active: bool,
}

/// Looks up the user owning an API token.
///
/// `Ok(None)` means the token is unknown. `Err` is a backend failure and
/// is rendered as-is by the middleware.
#[async_trait]
pub trait ApiTokenResolver: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<Option<AuthenticatedUser>, AppError>;
}

/// Read the API token from the request headers. Empty values count as absent.
pub fn extract_api_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(API_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Resolves `X-API-Token` and inserts [`AuthenticatedUser`] into extensions.
///
/// Requests without a token, or with an unknown one, pass through
/// unauthenticated. Enforcement happens in [`CurrentUser`], so public routes
/// can sit behind the same layer.
pub async fn api_token_middleware(
    State(resolver): State<Arc<dyn ApiTokenResolver>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(token) = extract_api_token(request.headers()) {
        match resolver.resolve(&token).await? {
            Some(user) => {
                tracing::debug!(user_id = user.id, "API token resolved");
                request.extensions_mut().insert(user);
            }
            None => tracing::debug!("Unknown API token"),
        }
    }

    Ok(next.run(request).await)
}

/// Extractor for the authenticated caller.
///
/// ```ignore
/// async fn my_items(CurrentUser(user): CurrentUser) -> String {
///     format!("items of {}", user.id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized(INVALID_TOKEN.to_string()))
    }
}
