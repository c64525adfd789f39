use colored::{ColoredString, Colorize};

use crate::domain::{Match, Message, Player, PlayerId};
use crate::rating::{format_weight, WeightPair};
use crate::services::history::{MatchBreakdown, RatingHistory};
use crate::standings::StandingRow;

fn podium(rank: usize, text: String) -> ColoredString {
    match rank {
        1 => text.yellow().bold(),
        2 => text.white().bold(),
        3 => text.truecolor(205, 127, 50).bold(),
        _ => text.normal(),
    }
}

fn name_of(players: &[Player], id: PlayerId) -> String {
    players
        .iter()
        .find(|p| p.player_id == id)
        .map(Player::full_name)
        .unwrap_or_else(|| format!("#{}", id))
}

pub fn weight_line(ratings: (i32, i32), weights: WeightPair) -> String {
    format!(
        "{} vs {}: race to {}",
        ratings.0,
        ratings.1,
        format_weight(weights).bold()
    )
}

pub fn standings_table(rows: &[StandingRow]) -> String {
    let mut lines = vec![format!(
        "{:>4}  {:<24} {:>6} {:>4} {:>4} {:>6} {:>6}",
        "Rank", "Player", "Rating", "W", "L", "Points", "Race"
    )
    .bold()
    .to_string()];

    for row in rows {
        let line = format!(
            "{:>4}  {:<24} {:>6} {:>4} {:>4} {:>6} {:>6}",
            row.rank,
            row.player.full_name(),
            row.player.rating,
            row.stats.wins,
            row.stats.losses,
            row.stats.points,
            format_weight(row.weight_vs_leader)
        );
        lines.push(podium(row.rank, line).to_string());
    }

    if rows.is_empty() {
        lines.push("No players in this table yet.".dimmed().to_string());
    }
    lines.join("\n")
}

pub fn history_chart(history: &RatingHistory) -> String {
    let mut lines = vec![format!(
        "{} (current rating {})",
        history.player.full_name().bold(),
        history.player.rating
    )];

    let mut previous = None;
    for point in &history.points {
        let delta = match previous {
            Some(prev) if point.rating > prev => format!("+{}", point.rating - prev).green(),
            Some(prev) if point.rating < prev => format!("{}", point.rating - prev).red(),
            Some(_) => "0".normal(),
            None => "".normal(),
        };
        lines.push(format!("  game {:>3}  {:>5}  {}", point.game_number, point.rating, delta));
        previous = Some(point.rating);
    }

    if history.points.is_empty() {
        lines.push("  no games recorded".dimmed().to_string());
    }
    lines.join("\n")
}

pub fn match_breakdown(breakdown: &MatchBreakdown, players: &[Player]) -> String {
    let m = &breakdown.match_info;
    let p1 = name_of(players, m.player1_id);
    let p2 = name_of(players, m.player2_id);

    let mut lines = vec![format!(
        "{} vs {}  race {}  games {}-{}",
        p1.bold(),
        p2.bold(),
        format_weight(breakdown.weights),
        breakdown.score.player1_wins,
        breakdown.score.player2_wins
    )];

    for (idx, game) in breakdown.games.iter().enumerate() {
        lines.push(format!(
            "  {:>2}. {} beat {} {}-{} ({} left)  {}/{}",
            idx + 1,
            name_of(players, game.winner_id),
            name_of(players, game.loser_id),
            game.winner_score,
            game.loser_score,
            game.balls_remaining,
            format!("{:+}", game.winner_rating_change).green(),
            format!("{:+}", game.loser_rating_change).red()
        ));
    }
    lines.join("\n")
}

pub fn players_table(players: &[Player]) -> String {
    let mut lines = vec![format!("{:>5}  {:<24} {:>6} {:>6}", "ID", "Name", "Rating", "Games")
        .bold()
        .to_string()];
    for p in players {
        lines.push(format!(
            "{:>5}  {:<24} {:>6} {:>6}",
            p.player_id,
            p.full_name(),
            p.rating,
            p.games_played
        ));
    }
    lines.join("\n")
}

pub fn matches_table(matches: &[Match], players: &[Player]) -> String {
    let mut lines = vec![format!(
        "{:>5}  {:<16} {:<22} {:<22} {:>6}  {}",
        "ID", "When", "Player 1", "Player 2", "Race", "Status"
    )
    .bold()
    .to_string()];

    for m in matches {
        let status = if m.completed {
            match m.winner_id {
                Some(w) => format!("won by {}", name_of(players, w)).green(),
                None => "completed".green(),
            }
        } else {
            "scheduled".yellow()
        };
        lines.push(format!(
            "{:>5}  {:<16} {:<22} {:<22} {:>6}  {}",
            m.match_id,
            m.scheduled_date.format("%Y-%m-%d %H:%M"),
            name_of(players, m.player1_id),
            name_of(players, m.player2_id),
            format_weight(m.weights()),
            status
        ));
    }
    lines.join("\n")
}

/// Newest first
pub fn messages_list(messages: &[Message]) -> String {
    let mut ordered: Vec<&Message> = messages.iter().collect();
    ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    ordered
        .into_iter()
        .map(|msg| {
            let marker = if msg.is_read { " ".normal() } else { "*".cyan().bold() };
            format!(
                "{} [{}] {}  {}",
                marker,
                msg.message_id,
                msg.created_at.format("%Y-%m-%d %H:%M"),
                msg.subject
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecipientType;
    use chrono::NaiveDate;

    fn message(id: i64, day: u32, subject: &str) -> Message {
        Message {
            message_id: id,
            subject: subject.to_string(),
            body: String::new(),
            sender_id: 1,
            recipient_type: RecipientType::League,
            recipient_id: None,
            created_at: NaiveDate::from_ymd_opt(2025, 2, day)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            is_read: true,
        }
    }

    #[test]
    fn test_messages_newest_first() {
        colored::control::set_override(false);
        let text = messages_list(&[message(1, 1, "old"), message(2, 9, "new")]);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].ends_with("new"));
        assert!(lines[1].ends_with("old"));
    }

    #[test]
    fn test_unknown_player_name() {
        assert_eq!(name_of(&[], 42), "#42");
    }

    #[test]
    fn test_empty_standings() {
        colored::control::set_override(false);
        assert!(standings_table(&[]).contains("No players in this table yet."));
    }
}
