pub mod history;
pub mod score_sheet;
pub mod server;
pub mod standings;
