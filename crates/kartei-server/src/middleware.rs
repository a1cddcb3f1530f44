//! Cross-origin access and per-request logging for the review API.

use std::time::Instant;

use axum::{extract::Request, http::Method, middleware::Next, response::Response};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};

/// The review UI is served from another origin and only ever issues GET and
/// JSON POST requests.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

/// Log every finished request with its status and latency.
///
/// Health probes from the process supervisor go to `debug` so they do not
/// drown out review traffic. Server errors are logged at `warn`.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if response.status().is_server_error() {
        warn!(%method, path, status, elapsed_ms, "Request failed");
    } else if path == "/health" {
        debug!(%method, path, status, elapsed_ms, "Health check");
    } else {
        info!(%method, path, status, elapsed_ms, "Request served");
    }

    response
}
