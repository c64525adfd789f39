use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{Match, Player, PlayerId, PlayerScore};
use crate::rating::weighting::{match_weight, WeightPair};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StandingStats {
    pub wins: u32,
    pub losses: u32,
    pub points: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    pub rank: usize,
    pub player: Player,
    pub stats: StandingStats,
    /// Race against the table leader, this player's number first
    pub weight_vs_leader: WeightPair,
}

/// Ranks players by points, then rating, then games played (all descending).
///
/// The sort is stable, so players tied on all three keep roster order.
pub fn build_standings(players: &[Player], matches: &[Match], scores: &[PlayerScore]) -> Vec<StandingRow> {
    let stats = collect_stats(matches, scores);

    let mut ranked: Vec<(&Player, StandingStats)> = players
        .iter()
        .map(|p| (p, stats.get(&p.player_id).copied().unwrap_or_default()))
        .collect();

    ranked.sort_by(|(a, sa), (b, sb)| {
        sb.points
            .cmp(&sa.points)
            .then_with(|| b.rating.cmp(&a.rating))
            .then_with(|| b.games_played.cmp(&a.games_played))
    });

    let leader_rating = ranked.first().map(|(p, _)| p.rating);

    ranked
        .into_iter()
        .enumerate()
        .map(|(idx, (player, stats))| StandingRow {
            rank: idx + 1,
            weight_vs_leader: match_weight(player.rating, leader_rating.unwrap_or(player.rating)),
            player: player.clone(),
            stats,
        })
        .collect()
}

fn collect_stats(matches: &[Match], scores: &[PlayerScore]) -> HashMap<PlayerId, StandingStats> {
    let mut stats: HashMap<PlayerId, StandingStats> = HashMap::new();

    for score in scores {
        // a repeated row replaces the earlier one
        stats.entry(score.player_id).or_default().points = score.score;
    }

    for m in matches.iter().filter(|m| m.completed) {
        if let Some(winner) = m.winner_id {
            stats.entry(winner).or_default().wins += 1;
        }
        if let Some(loser) = m.loser_id {
            stats.entry(loser).or_default().losses += 1;
        }
    }

    stats
}
