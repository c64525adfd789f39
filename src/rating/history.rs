use crate::domain::{Game, Match, PlayerId, Rating};

use super::types::{GameLine, MatchScore, RatingPoint};

/// Builds the chart series for a player from their games.
///
/// Games are replayed oldest first; each point is the rating the player
/// walked away with after that game. Games the player did not take part in
/// are skipped.
pub fn rating_history(player_id: PlayerId, games: &[Game]) -> Vec<RatingPoint> {
    let mut ordered: Vec<&Game> = games.iter().filter(|g| takes_part(g, player_id)).collect();
    ordered.sort_by_key(|g| g.played_date);

    ordered
        .into_iter()
        .enumerate()
        .map(|(idx, game)| RatingPoint {
            game_number: idx + 1,
            rating: rating_after(game, player_id),
        })
        .collect()
}

fn takes_part(game: &Game, player_id: PlayerId) -> bool {
    game.winner_id == player_id || game.loser_id == player_id
}

/// Rating of `player_id` once `game` was applied
pub fn rating_after(game: &Game, player_id: PlayerId) -> Rating {
    let (before, change) = rating_side(game, player_id);
    before + change
}

/// `(rating_before, rating_change)` for the player's side of the game
pub fn rating_side(game: &Game, player_id: PlayerId) -> (Rating, i32) {
    if game.winner_id == player_id {
        (game.winner_rating, game.winner_rating_change)
    } else {
        (game.loser_rating, game.loser_rating_change)
    }
}

/// Balls the loser pocketed: their race target minus what they still needed.
pub fn loser_score(loser_weight: u32, balls_remaining: u32) -> i32 {
    loser_weight as i32 - balls_remaining as i32
}

/// Loser score of `game`, taking the loser's race target from `m`.
pub fn game_loser_score(m: &Match, game: &Game) -> i32 {
    let (w1, w2) = m.weights();
    let loser_weight = if game.loser_id == m.player1_id { w1 } else { w2 };
    loser_score(loser_weight, game.balls_remaining)
}

/// Tallies game wins per side of the match
pub fn match_score(m: &Match, games: &[Game]) -> MatchScore {
    games
        .iter()
        .filter(|g| g.match_id == m.match_id)
        .fold(MatchScore::default(), |mut score, game| {
            if game.winner_id == m.player1_id {
                score.player1_wins += 1;
            } else if game.winner_id == m.player2_id {
                score.player2_wins += 1;
            }
            score
        })
}

/// Scoreboard lines for the match's games, in play order
pub fn game_lines(m: &Match, games: &[Game]) -> Vec<GameLine> {
    let (w1, w2) = m.weights();
    let mut ordered: Vec<&Game> = games.iter().filter(|g| g.match_id == m.match_id).collect();
    ordered.sort_by_key(|g| g.played_date);

    ordered
        .into_iter()
        .map(|game| GameLine {
            game_id: game.game_id,
            winner_id: game.winner_id,
            loser_id: game.loser_id,
            winner_score: if game.winner_id == m.player1_id { w1 } else { w2 },
            loser_score: game_loser_score(m, game),
            balls_remaining: game.balls_remaining,
            winner_rating_change: game.winner_rating_change,
            loser_rating_change: game.loser_rating_change,
        })
        .collect()
}
