use serde::{Deserialize, Serialize};

use crate::domain::{GameId, PlayerId, Rating};

/// One point on a player's rating chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingPoint {
    /// 1-based, in play order
    pub game_number: usize,
    pub rating: Rating,
}

/// Games won by each side of a match, in player1/player2 order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchScore {
    pub player1_wins: u32,
    pub player2_wins: u32,
}

/// A recorded game seen from the scoreboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameLine {
    pub game_id: GameId,
    pub winner_id: PlayerId,
    pub loser_id: PlayerId,
    pub winner_score: u32,
    pub loser_score: i32,
    pub balls_remaining: u32,
    pub winner_rating_change: i32,
    pub loser_rating_change: i32,
}
