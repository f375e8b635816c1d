use axum_helpers::server::{close_database, create_production_app};
use core_config::tracing::{init_tracing, install_color_eyre};
use migration::Migrator;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Before any fallible operation, so startup errors are colored too
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    database::postgres::run_migrations::<Migrator>(&db, config.app.name)
        .await
        .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;

    let state = AppState { config, db };

    let app = api::app(state.clone())?;

    info!("Starting tracker API with graceful shutdown (30s timeout)");

    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            close_database(state.db, "postgres").await;
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Tracker API shutdown complete");
    Ok(())
}
