//! Relational database connector and utilities (SeaORM).
//!
//! Production runs on PostgreSQL. The same helpers accept any URL SeaORM
//! understands, which is how the test suites run on in-memory SQLite.

mod config;
mod connector;
mod health;
mod repository;

pub use config::PostgresConfig;
pub use connector::{
    connect, connect_from_config, connect_from_config_with_retry, connect_with_options,
    run_migrations,
};
pub use health::check_health;
pub use repository::BaseRepository;

pub use sea_orm::{ConnectOptions, DatabaseConnection, DbErr};
pub use sea_orm_migration::MigratorTrait;
