//! Connection cleanup during graceful shutdown.

use tracing::{error, info};

/// Close a SeaORM connection pool and log the outcome.
///
/// # Example
/// ```ignore
/// use axum_helpers::server::close_database;
///
/// close_database(db, "main").await;
/// ```
pub async fn close_database(db: sea_orm::DatabaseConnection, name: &str) {
    match db.close().await {
        Ok(_) => info!("Database connection '{}' closed successfully", name),
        Err(e) => error!("Error closing database connection '{}': {}", name, e),
    }
}
