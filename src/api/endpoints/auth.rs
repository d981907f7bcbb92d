//! Staff authentication endpoints.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::auth::{LOCKOUT_SECS, SESSION_TTL_SECS};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub passphrase: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in_secs: u64,
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub revoked: bool,
}

/// `POST /api/admin/login`. Exchange the staff passphrase for a
/// bearer token. Repeated failures lock the source address out.
pub async fn login(
    State(ctx): State<ApiContext>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let ip = addr.ip();

    {
        let guard = ctx
            .login_guard
            .lock()
            .map_err(|_| ApiError::Internal("login guard lock".into()))?;
        if guard.is_locked(ip) {
            return Err(ApiError::Locked {
                retry_after: LOCKOUT_SECS,
            });
        }
    }

    if !ctx.credential.verify(&body.passphrase) {
        tracing::warn!(%ip, "Admin login failed");
        let mut guard = ctx
            .login_guard
            .lock()
            .map_err(|_| ApiError::Internal("login guard lock".into()))?;
        guard.record_failure(ip);
        return Err(ApiError::Unauthorized);
    }

    {
        let mut guard = ctx
            .login_guard
            .lock()
            .map_err(|_| ApiError::Internal("login guard lock".into()))?;
        guard.clear(ip);
    }

    let token = {
        let mut sessions = ctx
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session lock".into()))?;
        sessions.issue()
    };

    tracing::info!(%ip, "Admin login succeeded");

    Ok(Json(LoginResponse {
        token,
        expires_in_secs: SESSION_TTL_SECS,
    }))
}

/// `POST /api/admin/logout`. Revoke the presented token.
pub async fn logout(
    State(ctx): State<ApiContext>,
    headers: HeaderMap,
) -> Result<Json<LogoutResponse>, ApiError> {
    let token = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;

    let revoked = {
        let mut sessions = ctx
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session lock".into()))?;
        sessions.revoke(token)
    };

    Ok(Json(LogoutResponse { revoked }))
}
