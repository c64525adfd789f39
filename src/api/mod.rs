pub mod handlers;
pub mod league_client;
pub mod models;
pub mod routes;

pub use league_client::{GameFilter, LeagueClient, MatchFilter};
