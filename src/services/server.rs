use anyhow::Result;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::handlers::AppState;
use crate::api::league_client::LeagueClient;
use crate::api::routes::create_router;
use crate::config::settings::AppConfig;
use crate::http::ApiHttpClient;

pub struct ServerService {
    port: u16,
    config: AppConfig,
}

impl ServerService {
    pub fn new(port: u16, config: AppConfig) -> Self {
        Self { port, config }
    }

    pub async fn run(&self) -> Result<()> {
        let http = ApiHttpClient::new(&self.config.api)?;
        let client = LeagueClient::new(http, self.config.cache.stale_time);

        let state = Arc::new(AppState { client });

        let app = create_router(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!("Server listening on {}, upstream {}", addr, self.config.api.base_url);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
