use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
};
use std::sync::Arc;

use crate::domain::MatchId;
use crate::errors::ApiError;
use crate::services::history::{HistoryService, MatchBreakdown};
use super::AppState;

pub async fn get_match_games(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(match_id): Path<MatchId>,
) -> Result<Json<MatchBreakdown>, ApiError> {
    let service = HistoryService::new(state.client_for(&headers));
    Ok(Json(service.match_breakdown(match_id).await?))
}
