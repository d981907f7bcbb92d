//! Admission API router.
//!
//! Returns a composable `Router` with every endpoint nested under
//! `/api/` and the built front end served for all other paths.
//! Public routes carry request logging only; staff routes sit behind
//! the session token middleware.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, Method};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::auth::AdminCredential;
use crate::state::AppState;

/// Build the admission API router.
///
/// Middleware uses `Extension<ApiContext>` (injected as the outermost
/// layer). Endpoint handlers use `State<ApiContext>` (provided via
/// `with_state`).
pub fn admission_router(
    state: Arc<AppState>,
    credential: AdminCredential,
    static_dir: &Path,
) -> Router {
    let ctx = ApiContext::new(state, credential);
    build_router(ctx, static_dir)
}

/// Build router from a pre-constructed `ApiContext`.
///
/// Used by integration tests that need the shared context (e.g. to
/// inspect the session store directly).
#[cfg(test)]
pub(crate) fn admission_router_with_ctx(ctx: ApiContext, static_dir: &Path) -> Router {
    build_router(ctx, static_dir)
}

fn build_router(ctx: ApiContext, static_dir: &Path) -> Router {
    // Public routes for applicants.
    //
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let public = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/applications", post(endpoints::applications::submit))
        .route("/applications/:id", put(endpoints::applications::update))
        .route("/lookup/:query", get(endpoints::lookup::find))
        .route("/results/:query", get(endpoints::results::check))
        .route("/admin/login", post(endpoints::auth::login))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(
            middleware::request_log::log_requests,
        ))
        .layer(axum::Extension(ctx.clone()));

    // Staff routes behind the session check.
    //
    // Layers are applied from bottom (innermost) to top (outermost):
    // Extension must be outermost so the admin middleware can extract
    // ApiContext; the request logger runs innermost so it sees the
    // handler's status.
    let admin = Router::new()
        .route("/admin/applications", get(endpoints::admin::list))
        .route(
            "/admin/applications/:id",
            get(endpoints::admin::detail).delete(endpoints::admin::remove),
        )
        .route("/admin/statistics", get(endpoints::statistics::overview))
        .route("/admin/logout", post(endpoints::auth::logout))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(
            middleware::request_log::log_requests,
        ))
        .layer(axum::middleware::from_fn(middleware::admin::require_admin))
        .layer(axum::Extension(ctx));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    // Unknown non-API paths fall back to index.html so client-side
    // routing works after a page refresh.
    let static_files = ServeDir::new(static_dir)
        .not_found_service(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .nest("/api", public)
        .nest("/api", admin)
        .fallback_service(static_files)
        .layer(cors)
}
