use log::debug;
use serde::Serialize;

use crate::api::league_client::{GameFilter, LeagueClient};
use crate::domain::{Match, MatchId, Player, PlayerId};
use crate::errors::ApiError;
use crate::rating::{game_lines, match_score, rating_history, GameLine, MatchScore, RatingPoint, WeightPair};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingHistory {
    pub player: Player,
    pub points: Vec<RatingPoint>,
}

/// A match with its games as shown on the scoreboard
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchBreakdown {
    #[serde(rename = "match")]
    pub match_info: Match,
    pub weights: WeightPair,
    pub score: MatchScore,
    pub games: Vec<GameLine>,
}

pub struct HistoryService {
    client: LeagueClient,
}

impl HistoryService {
    pub fn new(client: LeagueClient) -> Self {
        Self { client }
    }

    pub async fn rating_history(&self, player_id: PlayerId) -> Result<RatingHistory, ApiError> {
        let player = self.client.get_player(player_id).await?;
        let games = self.client.list_games(&GameFilter::for_player(player_id)).await?;
        debug!("Player {} has {} recorded games", player_id, games.len());

        Ok(RatingHistory {
            points: rating_history(player_id, &games),
            player,
        })
    }

    pub async fn match_breakdown(&self, match_id: MatchId) -> Result<MatchBreakdown, ApiError> {
        let m = self.client.get_match(match_id).await?;
        let games = self.client.list_games(&GameFilter::for_match(match_id)).await?;

        Ok(MatchBreakdown {
            weights: m.weights(),
            score: match_score(&m, &games),
            games: game_lines(&m, &games),
            match_info: m,
        })
    }
}
