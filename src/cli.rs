use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::domain::{DemoRole, DivisionId, MatchId, PlayerId, Rating, SessionId};

#[derive(Parser, Debug)]
#[command(author, version, about = "Pool league client: weights, standings and score sheets")]
pub struct Cli {
    /// League API base URL (overrides OPL_API_BASE)
    #[arg(long, global = true)]
    pub api: Option<String>,

    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Player,
}

impl From<Role> for DemoRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => DemoRole::Admin,
            Role::Player => DemoRole::Player,
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Start the view server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Race-to weights for two ratings
    Weight {
        #[arg(allow_negative_numbers = true)]
        player1_rating: Rating,
        #[arg(allow_negative_numbers = true)]
        player2_rating: Rating,
    },
    /// Session standings, optionally for one division
    Standings {
        #[arg(short, long)]
        session: SessionId,
        #[arg(short, long)]
        division: Option<DivisionId>,
    },
    /// Rating history of a player
    History { player_id: PlayerId },
    /// Print score sheets for one match or for a day's matches
    ScoreSheet {
        #[arg(short, long, conflicts_with = "date", required_unless_present = "date")]
        r#match: Option<MatchId>,
        /// YYYY-MM-DD
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(short, long, requires = "date")]
        division: Option<DivisionId>,
    },
    /// Log in with a Google ID token
    Login { credential: String },
    /// Log in as a demo account
    DemoLogin {
        #[arg(value_enum, default_value_t = Role::Player)]
        role: Role,
    },
    /// Forget the stored token
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List players
    Players,
    /// List matches, or show one match with its games
    Matches {
        #[arg(short, long)]
        session: Option<SessionId>,
        #[arg(short, long)]
        division: Option<DivisionId>,
        #[arg(short, long)]
        player: Option<PlayerId>,
        /// Show the game breakdown of a single match
        #[arg(short, long, conflicts_with_all = ["session", "division", "player"])]
        r#match: Option<MatchId>,
    },
    /// Generate the round-robin schedule for a session
    Schedule {
        #[arg(short, long)]
        session: SessionId,
        /// First match night, YYYY-MM-DDTHH:MM:SS
        #[arg(long)]
        start: NaiveDateTime,
        /// Play every opponent twice
        #[arg(long)]
        double: bool,
    },
    /// Record a match result, one score per game like `8-5`
    Record {
        match_id: MatchId,
        #[arg(required = true, num_args = 1..)]
        games: Vec<String>,
    },
    /// Show messages
    Messages {
        /// Mark this message as read
        #[arg(long)]
        read: Option<i64>,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_weight_with_negative_rating() {
        let cli = Cli::try_parse_from(["pool_league", "weight", "-20", "600"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Weight {
                player1_rating: -20,
                player2_rating: 600
            }
        );
    }

    #[test]
    fn test_parse_record() {
        let cli = Cli::try_parse_from(["pool_league", "record", "7", "8-5", "3-7"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Record {
                match_id: 7,
                games: vec!["8-5".to_string(), "3-7".to_string()]
            }
        );
    }

    #[test]
    fn test_score_sheet_needs_match_or_date() {
        assert!(Cli::try_parse_from(["pool_league", "score-sheet"]).is_err());
        let cli = Cli::try_parse_from(["pool_league", "score-sheet", "--date", "2025-01-06", "-d", "2"]).unwrap();
        assert_eq!(
            cli.command,
            Command::ScoreSheet {
                r#match: None,
                date: NaiveDate::from_ymd_opt(2025, 1, 6),
                division: Some(2)
            }
        );
    }

    #[test]
    fn test_global_api_flag() {
        let cli = Cli::try_parse_from(["pool_league", "players", "--api", "http://league.test"]).unwrap();
        assert_eq!(cli.api.as_deref(), Some("http://league.test"));
    }
}
