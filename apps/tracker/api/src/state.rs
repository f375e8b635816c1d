//! Shared application state.

use sea_orm::DatabaseConnection;

/// Cloned into every router that needs it (the pool is an `Arc` inside).
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub db: DatabaseConnection,
}
