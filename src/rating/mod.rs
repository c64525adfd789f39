pub mod history;
pub mod scoring;
pub mod types;
pub mod weighting;

pub use history::{game_lines, game_loser_score, loser_score, match_score, rating_history};
pub use scoring::{build_submission, current_race, current_ratings, GameScore};
pub use types::{GameLine, MatchScore, RatingPoint};
pub use weighting::{format_weight, match_weight, WeightPair};
