use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use log::{info, warn};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use crate::cache::{QueryCache, QueryKey, TokenStore};
use crate::config::settings::AppConfig;
use crate::domain::models::*;
use crate::errors::ApiError;
use crate::http::{ApiHttpClient, Query};

/// Filters accepted by `GET /matches/`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub player_id: Option<PlayerId>,
    pub match_id: Option<MatchId>,
    pub session_id: Option<SessionId>,
    pub division_id: Option<DivisionId>,
    pub completed: Option<bool>,
}

impl MatchFilter {
    pub fn for_match(match_id: MatchId) -> Self {
        Self {
            match_id: Some(match_id),
            ..Self::default()
        }
    }

    pub fn for_session(session_id: SessionId, division_id: Option<DivisionId>) -> Self {
        Self {
            session_id: Some(session_id),
            division_id,
            ..Self::default()
        }
    }

    /// Uncompleted matches on one day, optionally within a division
    pub fn on_date(date: NaiveDate, division_id: Option<DivisionId>) -> Self {
        Self {
            start_date: Some(date),
            end_date: Some(date),
            division_id,
            completed: Some(false),
            ..Self::default()
        }
    }

    /// The backend refuses unscoped match listings
    pub fn is_scoped(&self) -> bool {
        self.start_date.is_some()
            || self.player_id.is_some()
            || self.match_id.is_some()
            || self.session_id.is_some()
            || self.division_id.is_some()
    }

    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        if let Some(d) = self.start_date {
            query.push(("start_date", d.to_string()));
        }
        if let Some(d) = self.end_date {
            query.push(("end_date", d.to_string()));
        }
        if let Some(id) = self.player_id {
            query.push(("player_id", id.to_string()));
        }
        if let Some(id) = self.match_id {
            query.push(("match_id", id.to_string()));
        }
        if let Some(id) = self.session_id {
            query.push(("session_id", id.to_string()));
        }
        if let Some(id) = self.division_id {
            query.push(("division_id", id.to_string()));
        }
        if let Some(c) = self.completed {
            query.push(("completed", c.to_string()));
        }
        query
    }
}

/// Filters accepted by `GET /games/`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GameFilter {
    pub match_id: Option<MatchId>,
    pub player_id: Option<PlayerId>,
}

impl GameFilter {
    pub fn for_match(match_id: MatchId) -> Self {
        Self {
            match_id: Some(match_id),
            player_id: None,
        }
    }

    pub fn for_player(player_id: PlayerId) -> Self {
        Self {
            match_id: None,
            player_id: Some(player_id),
        }
    }

    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        if let Some(id) = self.match_id {
            query.push(("match_id", id.to_string()));
        }
        if let Some(id) = self.player_id {
            query.push(("player_id", id.to_string()));
        }
        query
    }
}

fn query_segment(query: &Query) -> String {
    query
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Typed client for the league REST API.
///
/// Reads go through a shared [`QueryCache`]; successful mutations invalidate
/// the keys they affect. Clones share the cache and the session token.
#[derive(Clone)]
pub struct LeagueClient {
    http: ApiHttpClient,
    cache: Arc<Mutex<QueryCache>>,
    token: Arc<Mutex<Option<String>>>,
    store: Option<TokenStore>,
}

impl LeagueClient {
    pub fn new(http: ApiHttpClient, stale_time: Duration) -> Self {
        Self {
            http,
            cache: Arc::new(Mutex::new(QueryCache::new(stale_time))),
            token: Arc::new(Mutex::new(None)),
            store: None,
        }
    }

    /// Client for the configured API, resuming the token saved by a previous login
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let http = ApiHttpClient::new(&config.api)?;
        let store = TokenStore::new(&config.auth.token_path);
        let token = store.load()?;

        let mut client = Self::new(http, config.cache.stale_time).with_token(token);
        client.store = Some(store);
        Ok(client)
    }

    /// Same API and settings, own cache, acting with `token`
    pub fn with_token(self, token: Option<String>) -> Self {
        let stale_time = self.lock_cache().stale_time();
        Self {
            http: self.http,
            cache: Arc::new(Mutex::new(QueryCache::new(stale_time))),
            token: Arc::new(Mutex::new(token)),
            store: self.store,
        }
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    pub fn token(&self) -> Option<String> {
        self.lock_token().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.lock_token().is_some()
    }

    // --- Auth ---

    pub async fn login(&self, credential: &str) -> Result<LoginResponse, ApiError> {
        let body = json!({ "credential": credential });
        let response: LoginResponse = self.send(Method::POST, "/auth/login", &body).await?;
        self.start_session(&response)?;
        Ok(response)
    }

    pub async fn demo_login(&self, role: DemoRole) -> Result<LoginResponse, ApiError> {
        let body = json!({ "role": role });
        let response: LoginResponse = self.send(Method::POST, "/auth/demo-login", &body).await?;
        self.start_session(&response)?;
        Ok(response)
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        self.cached_get(QueryKey::me(), "/auth/me", Query::new()).await
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        self.end_session()?;
        info!("Logged out");
        Ok(())
    }

    // --- Players ---

    pub async fn list_players(&self) -> Result<Vec<Player>, ApiError> {
        self.cached_get(QueryKey::players(), "/players/", Query::new()).await
    }

    pub async fn get_player(&self, id: PlayerId) -> Result<Player, ApiError> {
        let path = format!("/players/{}/", id);
        self.cached_get(QueryKey::player(id), &path, Query::new()).await
    }

    pub async fn create_player(&self, input: &PlayerInput) -> Result<Player, ApiError> {
        let player = self.send(Method::POST, "/players/", input).await?;
        self.invalidate(&[QueryKey::players()]);
        Ok(player)
    }

    pub async fn update_player(&self, id: PlayerId, player: &Player) -> Result<Player, ApiError> {
        let path = format!("/players/{}/", id);
        let updated = self.send(Method::PUT, &path, player).await?;
        self.invalidate(&[QueryKey::players(), QueryKey::player(id)]);
        Ok(updated)
    }

    // --- Matches ---

    pub async fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<Match>, ApiError> {
        if !filter.is_scoped() {
            return Err(ApiError::MissingFilter(
                "start_date, player_id, match_id, session_id, or division_id",
            ));
        }
        let query = filter.to_query();
        let key = QueryKey::matches().with(query_segment(&query));
        self.cached_get(key, "/matches/", query).await
    }

    /// The API only lists matches, so a single match is a filtered listing
    pub async fn get_match(&self, id: MatchId) -> Result<Match, ApiError> {
        self.list_matches(&MatchFilter::for_match(id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Status {
                status: StatusCode::NOT_FOUND,
                message: format!("Match {} not found", id),
            })
    }

    pub async fn create_match(&self, input: &NewMatch) -> Result<Match, ApiError> {
        let created = self.send(Method::POST, "/matches/", input).await?;
        self.invalidate(&[QueryKey::matches()]);
        Ok(created)
    }

    /// Submits the games of a match; the server applies ratings and marks it completed
    pub async fn complete_match(&self, id: MatchId, games: &[GameInput]) -> Result<Match, ApiError> {
        let path = format!("/matches/{}/", id);
        let updated = self.send(Method::PUT, &path, games).await?;
        self.invalidate(&[
            QueryKey::matches(),
            QueryKey::games().with(id),
            QueryKey::games(),
            QueryKey::players(),
            QueryKey::scores(),
        ]);
        Ok(updated)
    }

    pub async fn schedule_round_robin(&self, input: &ScheduleInput) -> Result<Vec<Match>, ApiError> {
        let matches: Vec<Match> = self.send(Method::POST, "/matches/schedule-round-robin/", input).await?;
        info!("Scheduled {} matches for session {}", matches.len(), input.session_id);
        self.invalidate(&[QueryKey::matches()]);
        Ok(matches)
    }

    // --- Games ---

    pub async fn list_games(&self, filter: &GameFilter) -> Result<Vec<Game>, ApiError> {
        if filter.match_id.is_none() && filter.player_id.is_none() {
            return Err(ApiError::MissingFilter("match_id or player_id"));
        }
        let query = filter.to_query();
        let key = match filter.match_id {
            Some(id) if filter.player_id.is_none() => QueryKey::games().with(id),
            _ => QueryKey::games().with(query_segment(&query)),
        };
        self.cached_get(key, "/games/", query).await
    }

    // --- Divisions ---

    pub async fn list_divisions(&self) -> Result<Vec<Division>, ApiError> {
        self.cached_get(QueryKey::divisions(), "/divisions/", Query::new()).await
    }

    pub async fn get_division(&self, id: DivisionId) -> Result<Division, ApiError> {
        let path = format!("/divisions/{}/", id);
        self.cached_get(QueryKey::division(id), &path, Query::new()).await
    }

    pub async fn create_division(&self, input: &DivisionInput) -> Result<Division, ApiError> {
        let created = self.send(Method::POST, "/divisions/", input).await?;
        self.invalidate(&[QueryKey::divisions()]);
        Ok(created)
    }

    pub async fn update_division(&self, id: DivisionId, division: &Division) -> Result<Division, ApiError> {
        let path = format!("/divisions/{}/", id);
        let updated = self.send(Method::PUT, &path, division).await?;
        self.invalidate(&[QueryKey::divisions()]);
        Ok(updated)
    }

    // --- Sessions ---

    pub async fn list_sessions(&self, active: Option<bool>) -> Result<Vec<Session>, ApiError> {
        let mut query = Query::new();
        if let Some(active) = active {
            query.push(("active", active.to_string()));
        }
        let key = QueryKey::sessions().with(query_segment(&query));
        self.cached_get(key, "/sessions/", query).await
    }

    pub async fn get_session(&self, id: SessionId) -> Result<Session, ApiError> {
        let path = format!("/sessions/{}/", id);
        self.cached_get(QueryKey::session(id), &path, Query::new()).await
    }

    pub async fn create_session(&self, input: &SessionInput) -> Result<Session, ApiError> {
        let created = self.send(Method::POST, "/sessions/", input).await?;
        self.invalidate(&[QueryKey::sessions()]);
        Ok(created)
    }

    pub async fn update_session(&self, id: SessionId, session: &Session) -> Result<Session, ApiError> {
        let path = format!("/sessions/{}/", id);
        let updated = self.send(Method::PUT, &path, session).await?;
        self.invalidate(&[QueryKey::sessions()]);
        Ok(updated)
    }

    // --- Scores ---

    pub async fn scores(&self, session_id: SessionId, division_id: Option<DivisionId>) -> Result<Vec<PlayerScore>, ApiError> {
        let mut query: Query = vec![("session_id", session_id.to_string())];
        if let Some(id) = division_id {
            query.push(("division_id", id.to_string()));
        }
        let key = QueryKey::scores().with(query_segment(&query));
        self.cached_get(key, "/scores", query).await
    }

    // --- Messages ---

    pub async fn list_messages(&self) -> Result<Vec<Message>, ApiError> {
        self.cached_get(QueryKey::messages(), "/messages/", Query::new()).await
    }

    pub async fn get_message(&self, id: MessageId) -> Result<Message, ApiError> {
        let path = format!("/messages/{}/", id);
        self.cached_get(QueryKey::message(id), &path, Query::new()).await
    }

    pub async fn create_message(&self, input: &MessageInput) -> Result<Message, ApiError> {
        let created = self.send(Method::POST, "/messages/", input).await?;
        self.invalidate(&[QueryKey::messages()]);
        Ok(created)
    }

    pub async fn mark_message_read(&self, id: MessageId) -> Result<(), ApiError> {
        let path = format!("/messages/{}/read/", id);
        let _: serde_json::Value = self.send(Method::PUT, &path, &json!({})).await?;
        self.invalidate(&[QueryKey::messages()]);
        Ok(())
    }

    pub async fn delete_message(&self, id: MessageId) -> Result<(), ApiError> {
        let path = format!("/messages/{}/", id);
        let result = self.http.delete(&path, self.token().as_deref()).await;
        self.observe(result)?;
        self.invalidate(&[QueryKey::messages()]);
        Ok(())
    }

    // --- Helper Methods ---

    async fn cached_get<T>(&self, key: QueryKey, path: &str, query: Query) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Serialize,
    {
        if let Some(hit) = self.lock_cache().get::<T>(&key) {
            return Ok(hit);
        }

        let result = self.http.get(path, &query, self.token().as_deref()).await;
        let data = self.observe(result)?;
        self.lock_cache().put(key, &data);
        Ok(data)
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let result = self.http.send(method, path, body, self.token().as_deref()).await;
        self.observe(result)
    }

    // Drops the session when the server says the token is no longer valid
    fn observe<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(ApiError::SessionExpired) = &result {
            warn!("Session expired, clearing stored token");
            self.end_session()?;
        }
        result
    }

    fn start_session(&self, response: &LoginResponse) -> Result<(), ApiError> {
        *self.lock_token() = Some(response.token.clone());
        self.lock_cache().clear();
        if let Some(store) = &self.store {
            store.save(&response.token).map_err(|e| ApiError::Cache(e.to_string()))?;
        }
        info!("Logged in as {}", response.user.email);
        Ok(())
    }

    fn end_session(&self) -> Result<(), ApiError> {
        *self.lock_token() = None;
        self.lock_cache().clear();
        if let Some(store) = &self.store {
            store.clear().map_err(|e| ApiError::Cache(e.to_string()))?;
        }
        Ok(())
    }

    fn invalidate(&self, keys: &[QueryKey]) {
        let mut cache = self.lock_cache();
        for key in keys {
            cache.invalidate(key);
        }
    }

    fn lock_cache(&self) -> MutexGuard<'_, QueryCache> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_token(&self) -> MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
