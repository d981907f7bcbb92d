//! Staff statistics endpoint.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::statistics::{self, AdmissionStatistics};

/// `GET /api/admin/statistics`. Seven-day submission overview.
pub async fn overview(
    State(ctx): State<ApiContext>,
) -> Result<Json<AdmissionStatistics>, ApiError> {
    let conn = ctx.state.open_db()?;
    let stats = statistics::admission_statistics(&conn)?;
    Ok(Json(stats))
}
