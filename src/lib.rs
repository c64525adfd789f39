pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod rating;
pub mod render;
pub mod services;
pub mod standings;

use std::future::Future;
use std::io;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;
use log::info;

use crate::api::league_client::{LeagueClient, MatchFilter};
use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::domain::{DemoRole, DivisionId, MatchId, PlayerId, Rating, ScheduleInput, SessionId};
use crate::rating::{build_submission, current_race, match_weight, GameScore};
use crate::services::history::HistoryService;
use crate::services::score_sheet::{render_text, ScoreSheetService, SheetRequest};
use crate::services::server::ServerService;
use crate::services::standings::StandingsService;

pub fn interpret() -> Cli {
    Cli::parse()
}

/// Environment configuration with the `--api` override applied
pub fn load_config(api: Option<&str>) -> AppConfig {
    let config = AppConfig::new();
    match api {
        Some(base_url) => config.with_base_url(base_url),
        None => config,
    }
}

fn run<F, T>(future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(future)
}

fn connect(config: &AppConfig) -> Result<LeagueClient> {
    LeagueClient::from_config(config).context("Failed to set up the league API client")
}

pub fn handle_serve(config: AppConfig, port: u16) -> Result<()> {
    run(async {
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_weight(player1_rating: Rating, player2_rating: Rating) -> Result<()> {
    let weights = match_weight(player1_rating, player2_rating);
    println!("{}", render::weight_line((player1_rating, player2_rating), weights));
    Ok(())
}

pub fn handle_standings(config: &AppConfig, session_id: SessionId, division_id: Option<DivisionId>) -> Result<()> {
    let client = connect(config)?;
    run(async {
        let rows = StandingsService::new(client).standings(session_id, division_id).await?;
        println!("{}", render::standings_table(&rows));
        Ok(())
    })
}

pub fn handle_history(config: &AppConfig, player_id: PlayerId) -> Result<()> {
    let client = connect(config)?;
    run(async {
        let history = HistoryService::new(client).rating_history(player_id).await?;
        println!("{}", render::history_chart(&history));
        Ok(())
    })
}

pub fn handle_score_sheet(
    config: &AppConfig,
    match_id: Option<MatchId>,
    date: Option<NaiveDate>,
    division_id: Option<DivisionId>,
) -> Result<()> {
    // clap requires one of --match and --date
    let request = match (match_id, date) {
        (Some(id), _) => SheetRequest::Match(id),
        (None, Some(date)) => SheetRequest::Date { date, division_id },
        (None, None) => anyhow::bail!("Either --match or --date is required"),
    };

    let client = connect(config)?;
    run(async {
        let document = ScoreSheetService::new(client).document(request).await?;
        print!("{}", render_text(&document));
        Ok(())
    })
}

pub fn handle_login(config: &AppConfig, credential: &str) -> Result<()> {
    let client = connect(config)?;
    run(async {
        let response = client.login(credential).await?;
        println!("Logged in as {}", response.user.email);
        Ok(())
    })
}

pub fn handle_demo_login(config: &AppConfig, role: DemoRole) -> Result<()> {
    let client = connect(config)?;
    run(async {
        let response = client.demo_login(role).await?;
        println!("Logged in as {} ({:?} demo)", response.user.email, role);
        Ok(())
    })
}

pub fn handle_logout(config: &AppConfig) -> Result<()> {
    connect(config)?.logout()?;
    println!("Logged out");
    Ok(())
}

pub fn handle_whoami(config: &AppConfig) -> Result<()> {
    let client = connect(config)?;
    if !client.is_logged_in() {
        println!("Not logged in");
        return Ok(());
    }

    run(async {
        let user = client.me().await?;
        let role = if user.is_admin { "admin" } else { "player" };
        println!("{} ({}){}", user.email, role, user.name.map(|n| format!(" - {}", n)).unwrap_or_default());
        Ok(())
    })
}

pub fn handle_players(config: &AppConfig) -> Result<()> {
    let client = connect(config)?;
    run(async {
        let players = client.list_players().await?;
        println!("{}", render::players_table(&players));
        Ok(())
    })
}

pub fn handle_matches(config: &AppConfig, filter: MatchFilter) -> Result<()> {
    let client = connect(config)?;
    run(async {
        let players = client.list_players().await?;

        if let Some(match_id) = filter.match_id {
            let breakdown = HistoryService::new(client).match_breakdown(match_id).await?;
            println!("{}", render::match_breakdown(&breakdown, &players));
            return Ok(());
        }

        let matches = client.list_matches(&filter).await?;
        println!("{}", render::matches_table(&matches, &players));
        Ok(())
    })
}

pub fn handle_schedule(config: &AppConfig, session_id: SessionId, start_date: NaiveDateTime, double: bool) -> Result<()> {
    let client = connect(config)?;
    run(async {
        let input = ScheduleInput {
            session_id,
            start_date,
            double: double.then_some(true),
        };
        let matches = client.schedule_round_robin(&input).await?;
        let players = client.list_players().await?;
        println!("{}", render::matches_table(&matches, &players));
        Ok(())
    })
}

pub fn handle_record(config: &AppConfig, match_id: MatchId, games: &[String]) -> Result<()> {
    let scores = games
        .iter()
        .map(|g| g.parse::<GameScore>())
        .collect::<Result<Vec<_>>>()?;

    let client = connect(config)?;
    run(async {
        let players = client.list_players().await?;
        let m = client.get_match(match_id).await?;
        let submission = build_submission(&m, current_race(&m, &players), &scores)?;
        client.complete_match(match_id, &submission).await?;
        info!("Recorded {} games for match {}", submission.len(), match_id);

        // ratings moved, so the roster is fetched again
        let breakdown = HistoryService::new(client.clone()).match_breakdown(match_id).await?;
        let players = client.list_players().await?;
        println!("{}", render::match_breakdown(&breakdown, &players));
        Ok(())
    })
}

pub fn handle_messages(config: &AppConfig, mark_read: Option<i64>) -> Result<()> {
    let client = connect(config)?;
    run(async {
        if let Some(id) = mark_read {
            client.mark_message_read(id).await?;
        }
        let messages = client.list_messages().await?;
        println!("{}", render::messages_list(&messages));
        Ok(())
    })
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
    Ok(())
}

pub fn execute(cli: Cli) -> Result<()> {
    let config = load_config(cli.api.as_deref());

    match cli.command {
        Command::Serve { port } => handle_serve(config, port),
        Command::Weight {
            player1_rating,
            player2_rating,
        } => handle_weight(player1_rating, player2_rating),
        Command::Standings { session, division } => handle_standings(&config, session, division),
        Command::History { player_id } => handle_history(&config, player_id),
        Command::ScoreSheet {
            r#match,
            date,
            division,
        } => handle_score_sheet(&config, r#match, date, division),
        Command::Login { credential } => handle_login(&config, &credential),
        Command::DemoLogin { role } => handle_demo_login(&config, role.into()),
        Command::Logout => handle_logout(&config),
        Command::Whoami => handle_whoami(&config),
        Command::Players => handle_players(&config),
        Command::Matches {
            session,
            division,
            player,
            r#match,
        } => handle_matches(
            &config,
            MatchFilter {
                session_id: session,
                division_id: division,
                player_id: player,
                match_id: r#match,
                ..MatchFilter::default()
            },
        ),
        Command::Schedule { session, start, double } => handle_schedule(&config, session, start, double),
        Command::Record { match_id, games } => handle_record(&config, match_id, &games),
        Command::Messages { read } => handle_messages(&config, read),
        Command::Completions { shell } => handle_completions(shell),
    }
}
