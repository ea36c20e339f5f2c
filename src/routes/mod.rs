//! HTTP route definitions and handlers.
//!
//! Every route, including unknown paths, sits behind the recording
//! middleware, so each request the server answers is counted once.

mod dashboard_routes;
mod health_routes;
mod metrics;
mod record_middleware;

use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;
use axum::{Router, http::StatusCode, middleware};

pub use dashboard_routes::render_dashboard;

/// Creates the application router with all configured routes.
///
/// Combines all route modules into a single router, wraps it in the traffic
/// recording middleware and attaches the application state.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(dashboard_routes::routes())
        .merge(metrics::routes())
        .merge(health_routes::routes())
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            record_middleware::record_traffic,
        ))
        .with_state(state)
}

async fn not_found() -> HTTPError {
    HTTPError::new(StatusCode::NOT_FOUND, "Not found")
}
