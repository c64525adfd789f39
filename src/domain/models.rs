use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::rating::weighting::{match_weight, WeightPair};

pub type PlayerId = i64;
pub type MatchId = i64;
pub type GameId = i64;
pub type DivisionId = i64;
pub type SessionId = i64;
pub type MessageId = i64;
pub type Rating = i32;

/// League player as returned by `/players/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: PlayerId,
    pub first_name: String,
    pub last_name: String,
    pub rating: Rating,
    #[serde(default)]
    pub games_played: i32,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub email_notifications: bool,
    #[serde(default)]
    pub match_reminders: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division_id: Option<DivisionId>,
}

impl Player {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub first_name: String,
    pub last_name: String,
    pub rating: Rating,
    pub games_played: i32,
    pub phone: String,
    pub email: String,
    pub email_notifications: bool,
    pub match_reminders: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Division {
    pub division_id: DivisionId,
    pub name: String,
    /// 0 = Monday .. 6 = Sunday
    #[serde(default)]
    pub day_of_week: u8,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivisionInput {
    pub name: String,
    pub day_of_week: u8,
    pub active: bool,
}

/// Time-boxed competition period within a division
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: SessionId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// HH:MM
    pub match_time: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInput {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub match_time: String,
    pub active: bool,
}

/// Head-to-head contest between two players
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub match_id: MatchId,
    #[serde(default)]
    pub session_id: Option<SessionId>,
    pub division_id: DivisionId,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub player1_rating: Rating,
    pub player2_rating: Rating,
    #[serde(default)]
    pub player1_weight: u32,
    #[serde(default)]
    pub player2_weight: u32,
    pub scheduled_date: NaiveDateTime,
    pub completed: bool,
    #[serde(default)]
    pub winner_id: Option<PlayerId>,
    #[serde(default)]
    pub loser_id: Option<PlayerId>,
}

impl Match {
    /// Race-to pair for this match.
    ///
    /// Matches scheduled before weights were stored come back with zeros, in
    /// which case the pair is derived from the ratings captured at scheduling time.
    pub fn weights(&self) -> WeightPair {
        if self.player1_weight > 0 && self.player2_weight > 0 {
            (self.player1_weight, self.player2_weight)
        } else {
            match_weight(self.player1_rating, self.player2_rating)
        }
    }

    /// Weight of the given player, if they take part in this match
    pub fn weight_for(&self, player_id: PlayerId) -> Option<u32> {
        let (w1, w2) = self.weights();
        if player_id == self.player1_id {
            Some(w1)
        } else if player_id == self.player2_id {
            Some(w2)
        } else {
            None
        }
    }

    pub fn involves(&self, player_id: PlayerId) -> bool {
        self.player1_id == player_id || self.player2_id == player_id
    }

    pub fn opponent_of(&self, player_id: PlayerId) -> Option<PlayerId> {
        if player_id == self.player1_id {
            Some(self.player2_id)
        } else if player_id == self.player2_id {
            Some(self.player1_id)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMatch {
    pub session_id: Option<SessionId>,
    pub division_id: DivisionId,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub player1_rating: Rating,
    pub player2_rating: Rating,
    pub player1_weight: u32,
    pub player2_weight: u32,
    pub scheduled_date: NaiveDateTime,
    pub completed: bool,
}

/// Single rack within a match, with the rating adjustment it produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub game_id: GameId,
    pub match_id: MatchId,
    pub winner_id: PlayerId,
    pub loser_id: PlayerId,
    pub winner_rating: Rating,
    pub loser_rating: Rating,
    pub winner_rating_change: i32,
    pub loser_rating_change: i32,
    pub balls_remaining: u32,
    pub played_date: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInput {
    pub winner_id: PlayerId,
    pub loser_id: PlayerId,
    pub balls_remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub session_id: SessionId,
    pub start_date: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub double: Option<bool>,
}

/// Accumulated session points for one player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub player_id: PlayerId,
    pub score: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientType {
    Player,
    Division,
    League,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: MessageId,
    pub subject: String,
    pub body: String,
    pub sender_id: i64,
    pub recipient_type: RecipientType,
    #[serde(default)]
    pub recipient_id: Option<i64>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub is_read: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageInput {
    pub subject: String,
    pub body: String,
    pub recipient_type: RecipientType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_ids: Option<Vec<PlayerId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_email: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub email: String,
    #[serde(default)]
    pub google_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub player_id: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemoRole {
    Admin,
    Player,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_match() -> Match {
        serde_json::from_value(json!({
            "match_id": 7,
            "session_id": 2,
            "division_id": 1,
            "player1_id": 10,
            "player2_id": 11,
            "player1_rating": 600,
            "player2_rating": 720,
            "scheduled_date": "2025-01-06T19:00:00",
            "completed": false,
            "winner_id": null,
            "loser_id": null
        }))
        .unwrap()
    }

    #[test]
    fn test_match_without_stored_weights_derives_them() {
        let m = sample_match();
        assert_eq!(m.player1_weight, 0);
        assert_eq!(m.weights(), (7, 9));
    }

    #[test]
    fn test_match_prefers_stored_weights() {
        let mut m = sample_match();
        m.player1_weight = 8;
        m.player2_weight = 8;
        assert_eq!(m.weights(), (8, 8));
    }

    #[test]
    fn test_weight_for_and_opponent() {
        let m = sample_match();
        assert_eq!(m.weight_for(10), Some(7));
        assert_eq!(m.weight_for(11), Some(9));
        assert_eq!(m.weight_for(99), None);
        assert_eq!(m.opponent_of(11), Some(10));
        assert!(m.involves(10));
        assert!(!m.involves(12));
    }

    #[test]
    fn test_player_defaults_for_missing_fields() {
        let player: Player = serde_json::from_value(json!({
            "player_id": 3,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "rating": 640
        }))
        .unwrap();

        assert_eq!(player.games_played, 0);
        assert!(!player.match_reminders);
        assert_eq!(player.division_id, None);
        assert_eq!(player.full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_recipient_type_wire_format() {
        let value = serde_json::to_value(RecipientType::Division).unwrap();
        assert_eq!(value, json!("division"));
    }
}
