//! Custom extractors and shared request parameters for Axum handlers.

pub mod pagination;
pub mod validated_json;

pub use pagination::Pagination;
pub use validated_json::ValidatedJson;
