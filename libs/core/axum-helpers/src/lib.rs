//! # Axum Helpers
//!
//! Utilities, middleware, and helpers shared by the HTTP services.
//!
//! ## Modules
//!
//! - **[`auth`]**: `X-API-Token` middleware and the `CurrentUser` extractor
//! - **[`server`]**: Router setup, health checks, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: Structured error responses with error codes
//! - **[`extractors`]**: Validated JSON, pagination parameters
//! - **[`audit`]**: Audit logging
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_production_app, create_router};
//! use core_config::server::ServerConfig;
//! use std::time::Duration;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default();
//!     let router = create_router::<ApiDoc>(Router::new(), &config)?;
//!     create_production_app(router, &config, Duration::from_secs(30), async {}).await?;
//!     Ok(())
//! }
//! ```

pub mod audit;
pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use auth::{
    API_TOKEN_HEADER, ApiTokenResolver, AuthenticatedUser, CurrentUser, api_token_middleware,
};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, close_database, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};

pub use http::{create_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{Pagination, ValidatedJson};

pub use audit::{AuditEvent, AuditOutcome, extract_ip_from_headers, extract_user_agent};
