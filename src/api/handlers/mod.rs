use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use log::{error, warn};

use crate::api::league_client::LeagueClient;
use crate::api::models::ErrorBody;
use crate::errors::ApiError;

pub mod matches;
pub mod players;
pub mod score_sheets;
pub mod standings;
pub mod weights;

pub struct AppState {
    pub client: LeagueClient,
}

impl AppState {
    /// Client acting on behalf of the caller.
    ///
    /// Anonymous requests share the server-wide cache; a caller with a bearer
    /// token gets a client of their own so cached responses never cross users.
    pub fn client_for(&self, headers: &HeaderMap) -> LeagueClient {
        match bearer_token(headers) {
            Some(token) => self.client.clone().with_token(Some(token)),
            None => self.client.clone(),
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

pub fn status_for(err: &ApiError) -> StatusCode {
    match err {
        ApiError::Status { status, .. } => *status,
        ApiError::SessionExpired => StatusCode::UNAUTHORIZED,
        ApiError::MissingFilter(_) => StatusCode::BAD_REQUEST,
        ApiError::Transport { .. } | ApiError::Decode { .. } => StatusCode::BAD_GATEWAY,
        ApiError::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            error!("Upstream failure: {}", self);
        } else {
            warn!("Request rejected ({}): {}", status, self);
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc".to_string()));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic xyz"));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&ApiError::SessionExpired), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(&ApiError::MissingFilter("match_id or date")), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&ApiError::Status {
                status: StatusCode::NOT_FOUND,
                message: "Player not found".to_string()
            }),
            StatusCode::NOT_FOUND
        );
    }
}
