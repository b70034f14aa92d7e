//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, rate limiting, tracing,
//! compression, panic recovery and the endpoint handlers.

use std::any::Any;
use std::future::Future;

use axum::http::{header, HeaderValue, Method};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use wayfarer_core::config::CorsConfig;
use wayfarer_core::error::{Result, WayfarerError};

use crate::error::ApiError;
use crate::handlers;
use crate::rate_limit::RateLimiter;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
///
/// # Arguments
/// * `state` - The shared application state.
///
/// # Returns
/// A fully configured axum Router ready to serve requests.
pub fn create_router(state: AppState) -> Router {
    let mut suggestion_routes = Router::new().route("/autocomplete", get(handlers::autocomplete));

    if state.config.rate_limit.enabled {
        let limiter = RateLimiter::new(state.config.rate_limit.max_per_sec);
        suggestion_routes = suggestion_routes
            .layer(axum::middleware::from_fn(
                crate::rate_limit::rate_limit_middleware,
            ))
            .layer(axum::Extension(limiter));
    }

    let routes = Router::new()
        .route("/health", get(handlers::health))
        .merge(suggestion_routes);

    with_middleware(routes, state)
}

/// Wrap `routes` in the service-wide layers (panic recovery, compression,
/// request tracing, CORS) and attach the state.
pub fn with_middleware(routes: Router<AppState>, state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    routes
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if config.allows_any() {
        return layer.allow_origin(AnyOrigin);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

/// Turn a handler panic into a generic 500 with no partial payload.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    tracing::error!(detail, "Handler panicked");

    ApiError::Internal("Internal server error".to_string()).into_response()
}

/// Bind to the configured address and serve until `shutdown` resolves.
pub async fn start_server<F>(state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = state.config.server.addr();
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| WayfarerError::Server(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!(addr = %addr, "API server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| WayfarerError::Server(format!("Server error: {}", e)))?;

    tracing::info!("API server stopped");
    Ok(())
}
