use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Json,
};
use std::sync::Arc;

use crate::api::models::StandingsParams;
use crate::errors::ApiError;
use crate::services::standings::StandingsService;
use crate::standings::StandingRow;
use super::AppState;

pub async fn get_standings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<StandingsParams>,
) -> Result<Json<Vec<StandingRow>>, ApiError> {
    let service = StandingsService::new(state.client_for(&headers));
    let rows = service.standings(params.session_id, params.division_id).await?;
    Ok(Json(rows))
}
