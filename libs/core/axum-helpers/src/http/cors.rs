use axum::http::{HeaderName, HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::auth::API_TOKEN_HEADER;

/// Creates a CORS layer for the given origins.
///
/// - Methods: GET, POST, DELETE, OPTIONS
/// - Headers: Content-Type, Accept, X-API-Token
/// - Max age: 1 hour
///
/// # Errors
/// `InvalidInput` if `origins` is empty or an origin is not a valid header value.
pub fn create_cors_layer(origins: &[String]) -> io::Result<CorsLayer> {
    let allowed_origins = origins
        .iter()
        .map(|s| s.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        })?;

    if allowed_origins.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "CORS_ALLOWED_ORIGIN cannot be empty",
        ));
    }

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(API_TOKEN_HEADER),
        ])
        .max_age(Duration::from_secs(3600)))
}
