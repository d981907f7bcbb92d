//! Selection result endpoint.

use axum::extract::{Path, State};
use axum::Json;

use crate::announcements::{self, ExamResult};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::registry::LOOKUP_MISS_MESSAGE;

/// `GET /api/results/:query`. Selection verdict for an application
/// number or national ID.
pub async fn check(
    State(ctx): State<ApiContext>,
    Path(query): Path<String>,
) -> Result<Json<ExamResult>, ApiError> {
    let conn = ctx.state.open_db()?;
    let result = announcements::check_result(&conn, &query)?
        .ok_or_else(|| ApiError::NotFound(LOOKUP_MISS_MESSAGE.to_string()))?;
    Ok(Json(result))
}
