use crate::domain::Rating;

/// `(weight_for_player1, weight_for_player2)`
pub type WeightPair = (u32, u32);

// Inclusive upper bound on the rating gap, then (higher-rated, lower-rated) race
const WEIGHT_BRACKETS: [(u32, WeightPair); 8] = [
    (50, (8, 8)),
    (100, (8, 7)),
    (150, (9, 7)),
    (200, (9, 6)),
    (250, (10, 6)),
    (300, (10, 5)),
    (350, (11, 5)),
    (400, (11, 4)),
];
const WIDEST_GAP_WEIGHTS: WeightPair = (12, 4);

/// Race-to targets for a match between two ratings.
///
/// The higher-rated player gets the longer race. On equal ratings the first
/// player takes the higher number, which only matters once the brackets
/// produce unequal weights.
pub fn match_weight(player1_rating: Rating, player2_rating: Rating) -> WeightPair {
    let (high, low) = bracket_for_gap(player1_rating.abs_diff(player2_rating));
    assign_to_players(player1_rating, player2_rating, high, low)
}

fn bracket_for_gap(gap: u32) -> WeightPair {
    WEIGHT_BRACKETS
        .iter()
        .find(|(upper, _)| gap <= *upper)
        .map(|(_, weights)| *weights)
        .unwrap_or(WIDEST_GAP_WEIGHTS)
}

fn assign_to_players(player1_rating: Rating, player2_rating: Rating, high: u32, low: u32) -> WeightPair {
    if player1_rating >= player2_rating {
        (high, low)
    } else {
        (low, high)
    }
}

/// `"8:7"`, from the point of view of whoever is listed first
pub fn format_weight((mine, theirs): WeightPair) -> String {
    format!("{}:{}", mine, theirs)
}
