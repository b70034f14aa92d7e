//! Wayfarer API crate - axum HTTP server and route handlers.
//!
//! Serves staged booking suggestions over `GET /autocomplete` plus a
//! health check, with CORS, rate limiting and request tracing.

pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server, with_middleware};
pub use state::AppState;
