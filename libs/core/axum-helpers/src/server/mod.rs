//! Server infrastructure module.
//!
//! - Router setup with OpenAPI documentation
//! - Health and readiness helpers
//! - Graceful shutdown coordination
//! - Database connection cleanup
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::app_info;
//!
//! let router = create_router::<ApiDoc>(api_routes, &config.server)?
//!     .merge(health_router(app_info!()));
//!
//! create_production_app(router, &config.server, Duration::from_secs(30), cleanup).await?;
//! ```

pub mod app;
pub mod cleanup;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, create_router};
pub use cleanup::close_database;
pub use health::{
    HealthCheckFuture, HealthResponse, health_handler, health_router, run_health_checks,
};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
