use axum::{Router, middleware, routing::get};
use axum_helpers::{ApiTokenResolver, api_token_middleware, create_router, health_router};
use std::sync::Arc;

use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod health;
pub mod items;
pub mod users;

/// API routes without the `/api` prefix (added by `create_router`).
///
/// Every route sits behind the token middleware; handlers that need a caller
/// take `CurrentUser`, so registration stays public.
pub fn routes(state: &AppState) -> Router {
    let user_service = users::service(state);
    let resolver: Arc<dyn ApiTokenResolver> = Arc::new(user_service.clone());

    Router::new()
        .merge(domain_users::handlers::router(user_service))
        .merge(items::router(state))
        .layer(middleware::from_fn_with_state(resolver, api_token_middleware))
}

/// `/ready` with a real database check. Merged beside the stateless app router.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

/// Complete application: docs, `/api`, liveness and readiness.
pub fn app(state: AppState) -> std::io::Result<Router> {
    let router = create_router::<ApiDoc>(routes(&state), &state.config.server)?;

    Ok(router
        .merge(health_router(state.config.app))
        .merge(ready_router(state)))
}
