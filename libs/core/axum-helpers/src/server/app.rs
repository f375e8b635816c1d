use super::shutdown::{ShutdownCoordinator, coordinated_shutdown};
use crate::errors::handlers::not_found;
use crate::http::{create_cors_layer, security_headers};
use axum::{Json, Router, middleware, routing::get};
use core_config::server::ServerConfig;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;

/// Creates a configured Axum router with common middleware and documentation.
///
/// - OpenAPI JSON at `/api-docs/openapi.json`, Scalar UI at `/scalar`
/// - `apis` nested under `/api`
/// - JSON 404 fallback
/// - Request tracing, security headers, response compression
/// - CORS, only when `server_config.cors_allowed_origins` is non-empty
///
/// Health endpoints are merged by the app with [`health_router`](super::health_router)
/// and its own readiness handler.
///
/// # Errors
/// `InvalidInput` if a configured CORS origin is not a valid header value.
///
/// # Example
/// ```ignore
/// #[derive(OpenApi)]
/// #[openapi(paths(/* your paths */))]
/// struct ApiDoc;
///
/// let api_routes = Router::new()
///     .route("/example", get(handler))
///     .with_state(my_state);
///
/// let router = create_router::<ApiDoc>(api_routes, &config.server)?;
/// ```
pub fn create_router<T>(apis: Router, server_config: &ServerConfig) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use utoipa_scalar::{Scalar, Servable as ScalarServable};

    let openapi = T::openapi();

    let mut router = Router::new()
        .route(
            "/api-docs/openapi.json",
            get({
                let doc = openapi.clone();
                move || async move { Json(doc) }
            }),
        )
        .merge(Scalar::with_url("/scalar", openapi))
        .nest("/api", apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers));

    if server_config.cors_allowed_origins.is_empty() {
        info!("CORS_ALLOWED_ORIGIN not set, CORS layer disabled");
    } else {
        info!(
            "CORS configured with allowed origins: {}",
            server_config.cors_allowed_origins.join(",")
        );
        router = router.layer(create_cors_layer(&server_config.cors_allowed_origins)?);
    }

    Ok(router.layer(CompressionLayer::new()))
}

/// Serve with coordinated shutdown, then run `cleanup` within `shutdown_timeout`.
///
/// # Example
/// ```ignore
/// let cleanup = async move {
///     close_database(db, "main").await;
/// };
///
/// create_production_app(router, &config.server, Duration::from_secs(30), cleanup).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let (coordinator, _rx) = ShutdownCoordinator::new();
    let shutdown_handle = coordinator.clone();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let cleanup_handle = tokio::spawn(async move {
        shutdown_handle.wait_for_signal().await;

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(_) => info!("Cleanup completed successfully"),
            Err(_) => tracing::warn!(
                "Cleanup exceeded timeout of {:?}, forcing shutdown",
                shutdown_timeout
            ),
        }
    });

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(coordinated_shutdown(coordinator))
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    cleanup_handle.await.ok();

    serve_result
}
