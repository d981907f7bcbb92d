//! Bearer token middleware for staff endpoints.
//!
//! Extracts `Authorization: Bearer <token>` and validates it against
//! the session store. Tokens are not rotated; sessions simply expire
//! and staff log in again.

use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

/// Require a valid staff session token.
///
/// Accesses `ApiContext` from request extensions (injected by the
/// Extension layer).
pub async fn require_admin(
    req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    match require_admin_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_admin_inner(
    req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let token = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?
        .to_string();

    {
        let sessions = ctx
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session lock".into()))?;
        if !sessions.validate(&token) {
            return Err(ApiError::Unauthorized);
        }
    } // MutexGuard dropped here, before any .await

    let mut response = next.run(req).await;
    response
        .headers_mut()
        .insert("Cache-Control", HeaderValue::from_static("no-store"));

    Ok(response)
}
