//! Users Domain
//!
//! Registration, token authentication and deactivation. Deactivation is a
//! soft delete: the row stays, `is_active` goes false and the user's items
//! are handed to another active user (see [`deactivation`]).
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_users::{handlers, PgUserRepository, UserService};
//!
//! let service = UserService::new(PgUserRepository::new(db.clone()));
//! let resolver: Arc<dyn ApiTokenResolver> = Arc::new(service.clone());
//! let router = handlers::router(service);
//! ```

pub mod credentials;
pub mod deactivation;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use deactivation::{Deactivation, Reassignment, deactivate_and_reassign};
pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{CreateUser, NewUser, Pagination, User, UserResponse};
pub use postgres::PgUserRepository;
pub use repository::UserRepository;
pub use service::UserService;
