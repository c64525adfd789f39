use serde::{Deserialize, Serialize};

use crate::domain::{DivisionId, MatchId, Rating, SessionId};

#[derive(Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Deserialize)]
pub struct WeightParams {
    pub player1_rating: Rating,
    pub player2_rating: Rating,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightResponse {
    pub player1_rating: Rating,
    pub player2_rating: Rating,
    pub player1_weight: u32,
    pub player2_weight: u32,
    /// `"8:7"`, player1 first
    pub label: String,
}

#[derive(Deserialize)]
pub struct StandingsParams {
    pub session_id: SessionId,
    pub division_id: Option<DivisionId>,
}

#[derive(Deserialize)]
pub struct ScoreSheetParams {
    pub match_id: Option<MatchId>,
    pub date: Option<chrono::NaiveDate>,
    pub division_id: Option<DivisionId>,
}
