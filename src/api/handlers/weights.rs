use axum::{extract::Query, response::Json};

use crate::api::models::{WeightParams, WeightResponse};
use crate::rating::{format_weight, match_weight};

pub async fn get_weight(Query(params): Query<WeightParams>) -> Json<WeightResponse> {
    let weights = match_weight(params.player1_rating, params.player2_rating);

    Json(WeightResponse {
        player1_rating: params.player1_rating,
        player2_rating: params.player2_rating,
        player1_weight: weights.0,
        player2_weight: weights.1,
        label: format_weight(weights),
    })
}
