//! API-token authentication.
//!
//! Requests carry an opaque token in the `X-API-Token` header. The
//! [`api_token_middleware`] resolves it through an [`ApiTokenResolver`] and
//! stores the resulting [`AuthenticatedUser`] in the request extensions.
//! Handlers that require a caller take the [`CurrentUser`] extractor, which
//! rejects with 401 when nothing was resolved.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use axum_helpers::auth::{ApiTokenResolver, api_token_middleware};
//!
//! let resolver: Arc<dyn ApiTokenResolver> = Arc::new(user_service);
//! let api = Router::new()
//!     .merge(users_router)
//!     .merge(items_router)
//!     .layer(axum::middleware::from_fn_with_state(resolver, api_token_middleware));
//! ```

pub mod api_token;

pub use api_token::{
    API_TOKEN_HEADER, ApiTokenResolver, AuthenticatedUser, CurrentUser, api_token_middleware,
    extract_api_token,
};
