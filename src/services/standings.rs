use std::collections::HashSet;

use log::info;

use crate::api::league_client::{LeagueClient, MatchFilter};
use crate::domain::{DivisionId, Match, Player, PlayerId, PlayerScore, SessionId};
use crate::errors::ApiError;
use crate::standings::{build_standings, StandingRow};

pub struct StandingsService {
    client: LeagueClient,
}

impl StandingsService {
    pub fn new(client: LeagueClient) -> Self {
        Self { client }
    }

    /// Session table for one division, or for the whole session when `division_id` is absent
    pub async fn standings(
        &self,
        session_id: SessionId,
        division_id: Option<DivisionId>,
    ) -> Result<Vec<StandingRow>, ApiError> {
        let players = self.client.list_players().await?;
        let matches = self
            .client
            .list_matches(&MatchFilter::for_session(session_id, division_id))
            .await?;
        let scores = self.client.scores(session_id, division_id).await?;

        let roster = roster(&players, &matches, &scores, division_id);
        info!(
            "Standings for session {}: {} players, {} matches",
            session_id,
            roster.len(),
            matches.len()
        );

        Ok(build_standings(&roster, &matches, &scores))
    }
}

/// Players who belong to the table: assigned to the division, or seen in its matches or scores
fn roster(
    players: &[Player],
    matches: &[Match],
    scores: &[PlayerScore],
    division_id: Option<DivisionId>,
) -> Vec<Player> {
    let mut active: HashSet<PlayerId> = scores.iter().map(|s| s.player_id).collect();
    for m in matches {
        active.insert(m.player1_id);
        active.insert(m.player2_id);
    }

    players
        .iter()
        .filter(|p| {
            active.contains(&p.player_id) || (division_id.is_some() && p.division_id == division_id)
        })
        .cloned()
        .collect()
}
