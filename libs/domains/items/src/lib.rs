//! Items Domain
//!
//! Items always have exactly one owning user. They are created under an
//! owner and afterwards only change hands when that owner is deactivated
//! (see `domain_users::deactivation`).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + SeaORM implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Entity    │  ← `items` table
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_items::{handlers, ItemService, PgItemRepository};
//!
//! let service = ItemService::new(PgItemRepository::new(db.clone()));
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{ItemError, ItemResult};
pub use handlers::ApiDoc;
pub use models::{CreateItem, Item, Pagination};
pub use postgres::PgItemRepository;
pub use repository::ItemRepository;
pub use service::ItemService;
