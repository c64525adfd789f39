use std::fmt::Write as _;

use chrono::NaiveDate;
use log::info;
use serde::Serialize;

use crate::api::league_client::{LeagueClient, MatchFilter};
use crate::domain::{DivisionId, Match, MatchId, Player, PlayerId, Rating};
use crate::errors::ApiError;
use crate::rating::{current_race, current_ratings};

pub const GAME_COLUMNS: usize = 5;

const SIGNATURE_LINE: &str = "______________________________";

/// Which sheets to print
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetRequest {
    Match(MatchId),
    Date {
        date: NaiveDate,
        division_id: Option<DivisionId>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetPlayer {
    pub name: String,
    pub rating: Rating,
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSheet {
    pub match_id: MatchId,
    pub division_id: DivisionId,
    /// e.g. `Monday, January 6, 2025`
    pub date: String,
    pub player1: SheetPlayer,
    pub player2: SheetPlayer,
    pub game_columns: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSheetDocument {
    pub title: String,
    pub sheets: Vec<ScoreSheet>,
}

pub fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

fn short_date(date: NaiveDate) -> String {
    date.format("%m-%d-%Y").to_string()
}

fn sheet_name(players: &[Player], id: PlayerId) -> String {
    players
        .iter()
        .find(|p| p.player_id == id)
        .map_or_else(|| "Unknown".to_string(), Player::full_name)
}

/// Sheet for one match, using players' current ratings where the roster has them
pub fn build_sheet(m: &Match, players: &[Player]) -> ScoreSheet {
    let (rating1, rating2) = current_ratings(m, players);
    let (weight1, weight2) = current_race(m, players);
    let name1 = sheet_name(players, m.player1_id);
    let name2 = sheet_name(players, m.player2_id);

    ScoreSheet {
        match_id: m.match_id,
        division_id: m.division_id,
        date: long_date(m.scheduled_date.date()),
        player1: SheetPlayer {
            name: name1,
            rating: rating1,
            weight: weight1,
        },
        player2: SheetPlayer {
            name: name2,
            rating: rating2,
            weight: weight2,
        },
        game_columns: GAME_COLUMNS,
    }
}

pub fn single_document(m: &Match, players: &[Player]) -> ScoreSheetDocument {
    let sheet = build_sheet(m, players);
    ScoreSheetDocument {
        title: format!(
            "{} vs {} - {}",
            sheet.player1.name,
            sheet.player2.name,
            short_date(m.scheduled_date.date())
        ),
        sheets: vec![sheet],
    }
}

pub fn bulk_document(date: NaiveDate, matches: &[Match], players: &[Player]) -> ScoreSheetDocument {
    let mut ordered: Vec<&Match> = matches.iter().filter(|m| !m.completed).collect();
    ordered.sort_by_key(|m| (m.scheduled_date, m.match_id));

    ScoreSheetDocument {
        title: format!("Score Sheets - {}", short_date(date)),
        sheets: ordered.into_iter().map(|m| build_sheet(m, players)).collect(),
    }
}

/// Plain-text rendering, one sheet after another separated by form feeds
pub fn render_text(document: &ScoreSheetDocument) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", document.title);

    if document.sheets.is_empty() {
        let _ = writeln!(out, "\nNo matches to print.");
        return out;
    }

    for (idx, sheet) in document.sheets.iter().enumerate() {
        if idx > 0 {
            out.push('\x0c');
        }
        render_sheet(&mut out, sheet);
    }
    out
}

fn render_sheet(out: &mut String, sheet: &ScoreSheet) {
    let columns: String = (1..=sheet.game_columns).map(|n| format!(" G{} |", n)).collect();
    let blanks: String = (0..sheet.game_columns).map(|_| "    |".to_string()).collect();

    let _ = writeln!(out);
    let _ = writeln!(out, "{}    Match #{}", sheet.date, sheet.match_id);
    let _ = writeln!(out);
    let _ = writeln!(out, "{:<24} {:>6} {:>5} |{}", "Player", "Rating", "Race", columns);
    for player in [&sheet.player1, &sheet.player2] {
        let _ = writeln!(out, "{:<24} {:>6} {:>5} |{}", player.name, player.rating, player.weight, blanks);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Lag/flip winner: {}", SIGNATURE_LINE);
    let _ = writeln!(out, "Match winner:    {}", SIGNATURE_LINE);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}: {}", sheet.player1.name, SIGNATURE_LINE);
    let _ = writeln!(out, "{}: {}", sheet.player2.name, SIGNATURE_LINE);
}

pub struct ScoreSheetService {
    client: LeagueClient,
}

impl ScoreSheetService {
    pub fn new(client: LeagueClient) -> Self {
        Self { client }
    }

    pub async fn document(&self, request: SheetRequest) -> Result<ScoreSheetDocument, ApiError> {
        let players = self.client.list_players().await?;

        let document = match request {
            SheetRequest::Match(match_id) => {
                let m = self.client.get_match(match_id).await?;
                single_document(&m, &players)
            }
            SheetRequest::Date { date, division_id } => {
                let matches = self.client.list_matches(&MatchFilter::on_date(date, division_id)).await?;
                bulk_document(date, &matches, &players)
            }
        };

        info!("Prepared {} score sheet(s): {}", document.sheets.len(), document.title);
        Ok(document)
    }
}
