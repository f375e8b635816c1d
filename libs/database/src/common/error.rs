/// Unified error type for database plumbing (connect, migrate, health).
///
/// Domain crates keep their own error enums and only wrap `DbErr`.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[cfg(feature = "postgres")]
    #[error("Database error: {0}")]
    Postgres(#[from] sea_orm::DbErr),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Migration error: {0}")]
    MigrationError(String),
}

#[cfg(feature = "config")]
impl From<core_config::ConfigError> for DatabaseError {
    fn from(err: core_config::ConfigError) -> Self {
        DatabaseError::ConfigError(err.to_string())
    }
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
