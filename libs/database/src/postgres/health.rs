use sea_orm::DatabaseConnection;
use tracing::debug;

use crate::common::DatabaseError;

/// Check database health with a driver-level ping.
///
/// Backs the `/ready` endpoint.
pub async fn check_health(db: &DatabaseConnection) -> Result<(), DatabaseError> {
    debug!("Running database health check");

    db.ping()
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(format!("database ping failed: {}", e)))?;

    debug!("Database health check passed");
    Ok(())
}
