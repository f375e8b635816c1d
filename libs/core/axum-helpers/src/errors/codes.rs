//! Type-safe error codes for API responses.
//!
//! Each code carries a client-facing identifier (`"NOT_FOUND"`), an integer
//! for logs and dashboards (`1004`), and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::Conflict;
//! assert_eq!(code.as_str(), "CONFLICT");
//! assert_eq!(code.code(), 1008);
//! assert_eq!(code.default_message(), "Resource already exists");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    ValidationError,
    JsonExtraction,
    NotFound,
    Unauthorized,
    Conflict,

    // Server errors
    InternalError,

    // Database errors (2000-2999)
    DatabaseError,
    DatabasePoolTimeout,
}

impl ErrorCode {
    /// SCREAMING_SNAKE_CASE identifier for clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Conflict => "CONFLICT",
            Self::InternalError => "INTERNAL_ERROR",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::DatabasePoolTimeout => "DATABASE_POOL_TIMEOUT",
        }
    }

    /// Integer code for logging and monitoring.
    ///
    /// - 1000-1999: client and generic server errors
    /// - 2000-2999: database errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::Unauthorized => 1006,
            Self::Conflict => 1008,
            Self::DatabaseError => 2003,
            Self::DatabasePoolTimeout => 2013,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::Unauthorized => "Authentication required",
            Self::Conflict => "Resource already exists",
            Self::InternalError => "An internal server error occurred",
            Self::DatabaseError => "Database error occurred",
            Self::DatabasePoolTimeout => "Database connection pool timed out",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_string_and_integer() {
        assert_eq!(ErrorCode::NotFound.as_str(), "NOT_FOUND");
        assert_eq!(ErrorCode::Unauthorized.code(), 1006);
        assert_eq!(ErrorCode::DatabaseError.code(), 2003);
    }

    #[test]
    fn test_error_code_serde_matches_as_str() {
        for code in [
            ErrorCode::ValidationError,
            ErrorCode::Conflict,
            ErrorCode::DatabasePoolTimeout,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
            let back: ErrorCode = serde_json::from_str(&json).unwrap();
            assert_eq!(back, code);
        }
    }
}
