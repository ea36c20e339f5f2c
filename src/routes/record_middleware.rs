use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, trace};

use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

/// Axum middleware that counts every request before it reaches its handler.
///
/// The body is buffered (up to `limits.max_body_bytes`) so its length can be
/// recorded, then handed on unchanged. A body that cannot be read within the
/// limit is still counted, with the limit as its size, and answered with 413.
pub async fn record_traffic(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, HTTPError> {
    let (parts, body) = request.into_parts();
    let limit = state.config.limits.max_body_bytes;

    let bytes = match to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(e) => {
            state.traffic.record(limit as u64);
            debug!(method = %parts.method, path = %parts.uri.path(), bytes = limit as u64, "Rejecting request body: {}", e);
            return Err(HTTPError::new(
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("Request body could not be read within {} bytes", limit),
            ));
        }
    };

    let size = bytes.len() as u64;
    state.traffic.record(size);
    trace!(method = %parts.method, path = %parts.uri.path(), bytes = size, "Request recorded.");

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}
