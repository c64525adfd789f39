use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
};
use std::sync::Arc;

use crate::domain::PlayerId;
use crate::errors::ApiError;
use crate::services::history::{HistoryService, RatingHistory};
use super::AppState;

pub async fn get_rating_history(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(player_id): Path<PlayerId>,
) -> Result<Json<RatingHistory>, ApiError> {
    let service = HistoryService::new(state.client_for(&headers));
    Ok(Json(service.rating_history(player_id).await?))
}
