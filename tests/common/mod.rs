//! In-process stand-in for the league REST API

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pool_league::api::league_client::LeagueClient;
use pool_league::config::settings::AppConfig;
use pool_league::http::ApiHttpClient;

pub const GOOD_TOKEN: &str = "good-token";

#[derive(Default)]
pub struct Upstream {
    hits: Mutex<HashMap<String, usize>>,
    /// Number of 503s `/divisions/` still has to return
    pub division_failures: AtomicUsize,
}

impl Upstream {
    pub fn hits(&self, route: &str) -> usize {
        self.hits.lock().unwrap().get(route).copied().unwrap_or(0)
    }

    fn hit(&self, route: &str) {
        *self.hits.lock().unwrap().entry(route.to_string()).or_default() += 1;
    }
}

fn authorised(headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {}", GOOD_TOKEN);
    headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok()) == Some(expected.as_str())
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn player(id: i64, first: &str, rating: i32, games_played: i32) -> Value {
    json!({
        "player_id": id,
        "first_name": first,
        "last_name": "Smith",
        "rating": rating,
        "games_played": games_played,
        "phone": "",
        "email": format!("{}@league.test", first.to_lowercase()),
        "email_notifications": false,
        "match_reminders": true,
        "division_id": 1
    })
}

pub fn players() -> Vec<Value> {
    vec![
        player(1, "Ann", 700, 30),
        player(2, "Bob", 600, 25),
        player(3, "Cat", 640, 12),
    ]
}

pub fn matches() -> Vec<Value> {
    vec![
        json!({
            "match_id": 10, "session_id": 1, "division_id": 1,
            "player1_id": 1, "player2_id": 2,
            "player1_rating": 700, "player2_rating": 600,
            "player1_weight": 8, "player2_weight": 7,
            "scheduled_date": "2025-01-06T19:00:00",
            "completed": true, "winner_id": 1, "loser_id": 2
        }),
        json!({
            "match_id": 11, "session_id": 1, "division_id": 1,
            "player1_id": 2, "player2_id": 3,
            "player1_rating": 600, "player2_rating": 640,
            "player1_weight": 0, "player2_weight": 0,
            "scheduled_date": "2025-01-13T19:00:00",
            "completed": false, "winner_id": null, "loser_id": null
        }),
    ]
}

fn game(id: i64, winner: i64, loser: i64, ratings: (i32, i32), change: i32, balls: u32, played: &str) -> Value {
    json!({
        "game_id": id, "match_id": 10,
        "winner_id": winner, "loser_id": loser,
        "winner_rating": ratings.0, "loser_rating": ratings.1,
        "winner_rating_change": change, "loser_rating_change": -change,
        "balls_remaining": balls,
        "played_date": played
    })
}

pub fn games() -> Vec<Value> {
    // listed out of play order on purpose
    vec![
        game(101, 2, 1, (595, 705), 6, 2, "2025-01-06T19:45:00"),
        game(100, 1, 2, (700, 600), 5, 3, "2025-01-06T19:30:00"),
        game(102, 1, 2, (699, 601), 4, 4, "2025-01-06T20:00:00"),
    ]
}

fn user() -> Value {
    json!({
        "user_id": 5,
        "email": "ann@league.test",
        "google_id": null,
        "name": "Ann Smith",
        "picture": null,
        "is_admin": true,
        "player_id": 1
    })
}

async fn list_players(State(up): State<Arc<Upstream>>) -> Json<Vec<Value>> {
    up.hit("players");
    Json(players())
}

async fn create_player(State(up): State<Arc<Upstream>>, Json(body): Json<Value>) -> Json<Value> {
    up.hit("create_player");
    let mut created = body;
    created["player_id"] = json!(4);
    Json(created)
}

async fn get_player(State(up): State<Arc<Upstream>>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    up.hit("player");
    if headers.get(AUTHORIZATION).is_some() && !authorised(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    match players().into_iter().find(|p| p["player_id"] == json!(id)) {
        Some(p) => Json(p).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Player not found"),
    }
}

async fn list_matches(State(up): State<Arc<Upstream>>, Query(q): Query<HashMap<String, String>>) -> Response {
    up.hit("matches");
    let scoped = ["start_date", "player_id", "match_id", "session_id", "division_id"]
        .iter()
        .any(|k| q.contains_key(*k));
    if !scoped {
        return detail(StatusCode::BAD_REQUEST, "At least one filter is required");
    }

    let selected: Vec<Value> = matches()
        .into_iter()
        .filter(|m| q.get("match_id").is_none_or(|id| m["match_id"].to_string() == *id))
        .filter(|m| q.get("session_id").is_none_or(|id| m["session_id"].to_string() == *id))
        .filter(|m| q.get("division_id").is_none_or(|id| m["division_id"].to_string() == *id))
        .filter(|m| {
            q.get("start_date")
                .is_none_or(|d| m["scheduled_date"].as_str().is_some_and(|s| s.starts_with(d.as_str())))
        })
        .filter(|m| q.get("completed").is_none_or(|c| m["completed"].to_string() == *c))
        .collect();
    Json(selected).into_response()
}

async fn complete_match(State(up): State<Arc<Upstream>>, Path(id): Path<i64>, Json(games): Json<Vec<Value>>) -> Response {
    up.hit("complete_match");
    if games.is_empty() {
        return detail(StatusCode::BAD_REQUEST, "No games submitted");
    }
    let mut m = matches()
        .into_iter()
        .find(|m| m["match_id"] == json!(id))
        .unwrap_or_else(|| matches()[1].clone());
    m["completed"] = json!(true);
    Json(m).into_response()
}

async fn list_games(State(up): State<Arc<Upstream>>, Query(q): Query<HashMap<String, String>>) -> Response {
    up.hit("games");
    let selected: Vec<Value> = games()
        .into_iter()
        .filter(|g| q.get("match_id").is_none_or(|id| g["match_id"].to_string() == *id))
        .filter(|g| {
            q.get("player_id")
                .is_none_or(|id| g["winner_id"].to_string() == *id || g["loser_id"].to_string() == *id)
        })
        .collect();
    Json(selected).into_response()
}

async fn scores(State(up): State<Arc<Upstream>>, Query(q): Query<HashMap<String, String>>) -> Response {
    up.hit("scores");
    if q.get("session_id").map(String::as_str) != Some("1") {
        return Json(Vec::<Value>::new()).into_response();
    }
    Json(json!([
        { "player_id": 1, "score": 3 },
        { "player_id": 2, "score": 1 }
    ]))
    .into_response()
}

async fn divisions(State(up): State<Arc<Upstream>>) -> Response {
    up.hit("divisions");
    let pending = up.division_failures.load(Ordering::SeqCst);
    if pending > 0 {
        up.division_failures.store(pending - 1, Ordering::SeqCst);
        return (StatusCode::SERVICE_UNAVAILABLE, "busy").into_response();
    }
    Json(json!([{ "division_id": 1, "name": "Monday", "day_of_week": 0, "active": true }])).into_response()
}

fn with_id(mut body: Value, field: &str, id: i64) -> Json<Value> {
    body[field] = json!(id);
    Json(body)
}

async fn update_player(State(up): State<Arc<Upstream>>, Path(id): Path<i64>, Json(body): Json<Value>) -> Json<Value> {
    up.hit("update_player");
    with_id(body, "player_id", id)
}

async fn create_match(State(up): State<Arc<Upstream>>, Json(body): Json<Value>) -> Json<Value> {
    up.hit("create_match");
    with_id(body, "match_id", 12)
}

async fn create_division(State(up): State<Arc<Upstream>>, Json(body): Json<Value>) -> Json<Value> {
    up.hit("create_division");
    with_id(body, "division_id", 2)
}

async fn get_division(State(up): State<Arc<Upstream>>, Path(id): Path<i64>) -> Json<Value> {
    up.hit("division");
    Json(json!({ "division_id": id, "name": "Monday", "day_of_week": 0, "active": true }))
}

async fn update_division(State(up): State<Arc<Upstream>>, Path(id): Path<i64>, Json(body): Json<Value>) -> Json<Value> {
    up.hit("update_division");
    with_id(body, "division_id", id)
}

fn session(id: i64) -> Value {
    json!({
        "session_id": id,
        "name": "Winter 2025",
        "start_date": "2025-01-06",
        "end_date": "2025-03-31",
        "match_time": "19:00",
        "active": true
    })
}

async fn list_sessions(State(up): State<Arc<Upstream>>) -> Json<Vec<Value>> {
    up.hit("sessions");
    Json(vec![session(1)])
}

async fn create_session(State(up): State<Arc<Upstream>>, Json(body): Json<Value>) -> Json<Value> {
    up.hit("create_session");
    with_id(body, "session_id", 2)
}

async fn get_session(State(up): State<Arc<Upstream>>, Path(id): Path<i64>) -> Json<Value> {
    up.hit("session");
    Json(session(id))
}

async fn update_session(State(up): State<Arc<Upstream>>, Path(id): Path<i64>, Json(body): Json<Value>) -> Json<Value> {
    up.hit("update_session");
    with_id(body, "session_id", id)
}

fn message(id: i64) -> Value {
    json!({
        "message_id": id,
        "subject": "Schedule change",
        "body": "Week 3 moves to Tuesday",
        "sender_id": 5,
        "recipient_type": "league",
        "recipient_id": null,
        "created_at": "2025-01-10T12:00:00",
        "is_read": false
    })
}

async fn messages(State(up): State<Arc<Upstream>>, headers: HeaderMap) -> Response {
    up.hit("messages");
    if !authorised(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    Json(vec![message(1)]).into_response()
}

async fn create_message(State(up): State<Arc<Upstream>>, Json(body): Json<Value>) -> Json<Value> {
    up.hit("create_message");
    let mut created = body;
    created["message_id"] = json!(2);
    created["sender_id"] = json!(5);
    created["created_at"] = json!("2025-01-11T09:00:00");
    created["is_read"] = json!(false);
    Json(created)
}

async fn get_message(State(up): State<Arc<Upstream>>, Path(id): Path<i64>) -> Response {
    up.hit("message");
    if id != 1 {
        return detail(StatusCode::NOT_FOUND, "Message not found");
    }
    Json(message(id)).into_response()
}

async fn mark_read(State(up): State<Arc<Upstream>>) -> Json<Value> {
    up.hit("mark_read");
    Json(json!({ "ok": true }))
}

async fn delete_message(State(up): State<Arc<Upstream>>) -> Json<Value> {
    up.hit("delete_message");
    Json(json!({ "ok": true }))
}

async fn login(State(up): State<Arc<Upstream>>, Json(body): Json<Value>) -> Response {
    up.hit("login");
    if body["credential"] != json!("google-credential") {
        return detail(StatusCode::UNAUTHORIZED, "Invalid Google token");
    }
    Json(json!({ "token": GOOD_TOKEN, "user": user() })).into_response()
}

async fn me(State(up): State<Arc<Upstream>>, headers: HeaderMap) -> Response {
    up.hit("me");
    if !authorised(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    Json(user()).into_response()
}

/// Serves the fake API on an ephemeral port and returns its base URL
pub async fn spawn_upstream() -> (String, Arc<Upstream>) {
    let upstream = Arc::new(Upstream::default());

    let app = Router::new()
        .route("/players/", get(list_players).post(create_player))
        .route("/players/:id/", get(get_player).put(update_player))
        .route("/matches/", get(list_matches).post(create_match))
        .route("/matches/:id/", put(complete_match))
        .route("/games/", get(list_games))
        .route("/scores", get(scores))
        .route("/divisions/", get(divisions).post(create_division))
        .route("/divisions/:id/", get(get_division).put(update_division))
        .route("/sessions/", get(list_sessions).post(create_session))
        .route("/sessions/:id/", get(get_session).put(update_session))
        .route("/messages/", get(messages).post(create_message))
        .route("/messages/:id/", get(get_message).delete(delete_message))
        .route("/messages/:id/read/", put(mark_read))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .with_state(upstream.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), upstream)
}

pub fn test_config(base_url: &str) -> AppConfig {
    let mut config = AppConfig::default().with_base_url(base_url);
    config.api.retry_delay_ms = 10;
    config
}

pub fn test_client(base_url: &str) -> LeagueClient {
    let config = test_config(base_url);
    LeagueClient::new(ApiHttpClient::new(&config.api).unwrap(), config.cache.stale_time)
}
