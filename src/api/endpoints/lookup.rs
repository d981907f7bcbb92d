//! Exam-card lookup endpoint.

use axum::extract::{Path, State};
use axum::Json;

use crate::announcements::{self, CandidateNotice};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::registry::LOOKUP_MISS_MESSAGE;

/// `GET /api/lookup/:query`. Accepts an application number or a
/// 13-digit national ID and returns the exam-candidate notice for it.
pub async fn find(
    State(ctx): State<ApiContext>,
    Path(query): Path<String>,
) -> Result<Json<CandidateNotice>, ApiError> {
    let conn = ctx.state.open_db()?;
    let notice = announcements::find_candidate(&conn, &query)?
        .ok_or_else(|| ApiError::NotFound(LOOKUP_MISS_MESSAGE.to_string()))?;
    Ok(Json(notice))
}
