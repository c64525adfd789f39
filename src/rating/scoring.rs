use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::domain::{GameInput, Match, Player, PlayerId, Rating};

use super::weighting::{match_weight, WeightPair};

fn roster_rating(players: &[Player], id: PlayerId, rating_on_match: Rating) -> Rating {
    players
        .iter()
        .find(|p| p.player_id == id)
        .map_or(rating_on_match, |p| p.rating)
}

/// Ratings the match is played at: the roster's current ones, else those stored on the match
pub fn current_ratings(m: &Match, players: &[Player]) -> (Rating, Rating) {
    (
        roster_rating(players, m.player1_id, m.player1_rating),
        roster_rating(players, m.player2_id, m.player2_rating),
    )
}

/// Race printed on the score sheet and enforced when the result is recorded
pub fn current_race(m: &Match, players: &[Player]) -> WeightPair {
    let (r1, r2) = current_ratings(m, players);
    match_weight(r1, r2)
}

/// Balls pocketed by each side in one game, player1 first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameScore {
    pub player1_score: u32,
    pub player2_score: u32,
}

impl GameScore {
    pub fn new(player1_score: u32, player2_score: u32) -> Self {
        Self { player1_score, player2_score }
    }

    /// Exactly one side reached its race while the other fell short of theirs.
    pub fn is_valid(&self, (w1, w2): WeightPair) -> bool {
        let p1_won = self.player1_score == w1 && self.player2_score < w2;
        let p2_won = self.player2_score == w2 && self.player1_score < w1;
        p1_won || p2_won
    }

    /// Converts the scoreboard into what `/matches/{id}/` expects.
    pub fn to_game_input(&self, m: &Match, (w1, w2): WeightPair) -> GameInput {
        if self.player1_score == w1 {
            GameInput {
                winner_id: m.player1_id,
                loser_id: m.player2_id,
                balls_remaining: w2.saturating_sub(self.player2_score),
            }
        } else {
            GameInput {
                winner_id: m.player2_id,
                loser_id: m.player1_id,
                balls_remaining: w1.saturating_sub(self.player1_score),
            }
        }
    }
}

/// Parses `"8-5"` (player1 balls, player2 balls)
impl FromStr for GameScore {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (left, right) = s
            .split_once('-')
            .with_context(|| format!("Expected a score like 8-5, got '{}'", s))?;
        let player1_score = left.trim().parse().with_context(|| format!("Invalid score '{}'", s))?;
        let player2_score = right.trim().parse().with_context(|| format!("Invalid score '{}'", s))?;
        Ok(Self::new(player1_score, player2_score))
    }
}

/// Validates every game against `weights` and builds the submission.
pub fn build_submission(m: &Match, weights: WeightPair, scores: &[GameScore]) -> Result<Vec<GameInput>> {
    if scores.is_empty() {
        bail!("A match needs at least one game");
    }

    for (idx, score) in scores.iter().enumerate() {
        if !score.is_valid(weights) {
            bail!(
                "Game {} ({}-{}) does not finish a race to {}:{}",
                idx + 1,
                score.player1_score,
                score.player2_score,
                weights.0,
                weights.1
            );
        }
    }

    Ok(scores.iter().map(|s| s.to_game_input(m, weights)).collect())
}
