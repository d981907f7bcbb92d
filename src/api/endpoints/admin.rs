//! Staff registry endpoints.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository::applications;
use crate::models::Application;
use crate::registry::{self, RegistryError};

#[derive(Serialize)]
pub struct ApplicationListResponse {
    pub applications: Vec<Application>,
    pub total: usize,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub deleted: String,
}

/// `GET /api/admin/applications`. Every stored application, newest
/// first.
pub async fn list(
    State(ctx): State<ApiContext>,
) -> Result<Json<ApplicationListResponse>, ApiError> {
    let conn = ctx.state.open_db()?;
    let applications = applications::list_applications(&conn)?;
    let total = applications.len();
    Ok(Json(ApplicationListResponse {
        applications,
        total,
    }))
}

/// `GET /api/admin/applications/:id`. One stored application.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Application>, ApiError> {
    let conn = ctx.state.open_db()?;
    let application = applications::get_application(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound(format!("No application {id}")))?;
    Ok(Json(application))
}

/// `DELETE /api/admin/applications/:id`. Remove one application.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let conn = ctx.state.open_db()?;
    match registry::remove(&conn, &id) {
        Ok(()) => Ok(Json(DeleteResponse { deleted: id })),
        Err(RegistryError::UnknownApplication(_)) => {
            Err(ApiError::NotFound(format!("No application {id}")))
        }
        Err(e) => Err(e.into()),
    }
}
