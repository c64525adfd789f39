use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Json,
};
use std::sync::Arc;

use crate::api::models::ScoreSheetParams;
use crate::errors::ApiError;
use crate::services::score_sheet::{ScoreSheetDocument, ScoreSheetService, SheetRequest};
use super::AppState;

pub async fn get_score_sheets(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<ScoreSheetParams>,
) -> Result<Json<ScoreSheetDocument>, ApiError> {
    // match_id wins when both are given
    let request = match (params.match_id, params.date) {
        (Some(match_id), _) => SheetRequest::Match(match_id),
        (None, Some(date)) => SheetRequest::Date {
            date,
            division_id: params.division_id,
        },
        (None, None) => return Err(ApiError::MissingFilter("match_id or date")),
    };

    let service = ScoreSheetService::new(state.client_for(&headers));
    Ok(Json(service.document(request).await?))
}
