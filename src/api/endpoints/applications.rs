//! Application submission and edit endpoints.

use axum::extract::{Path, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{Application, ApplicationDraft};
use crate::registry;

/// `POST /api/applications`. Register a new application and return
/// the stored record with its exam-card snapshot.
pub async fn submit(
    State(ctx): State<ApiContext>,
    Json(draft): Json<ApplicationDraft>,
) -> Result<Json<Application>, ApiError> {
    let conn = ctx.state.open_db()?;
    let application = registry::submit(&conn, &ctx.state.plan, draft)?;
    Ok(Json(application))
}

/// `PUT /api/applications/:id`. Correct a submitted form. The
/// allocated IDs and seat stay as first issued.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Json(draft): Json<ApplicationDraft>,
) -> Result<Json<Application>, ApiError> {
    let conn = ctx.state.open_db()?;
    let application = registry::resubmit(&conn, &id, draft)?;
    Ok(Json(application))
}
