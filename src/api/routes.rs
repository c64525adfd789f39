use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::handlers::{
    matches::get_match_games, players::get_rating_history, score_sheets::get_score_sheets,
    standings::get_standings, weights::get_weight, AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/weight", get(get_weight))
        .route("/api/standings", get(get_standings))
        .route("/api/players/:id/rating-history", get(get_rating_history))
        .route("/api/matches/:id/games", get(get_match_games))
        .route("/api/score-sheets", get(get_score_sheets))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
