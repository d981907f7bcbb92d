//! Request logging middleware.
//!
//! Tags every request with a UUID and logs method, path, response
//! status, and handling time. Runs innermost so the logged status is
//! the handler's actual response.

use std::time::Instant;

use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

/// Log one line per handled request.
pub async fn log_requests(
    req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let request_id = Uuid::new_v4();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        %request_id,
        method,
        path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request handled"
    );

    response
}
