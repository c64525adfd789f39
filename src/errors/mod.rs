use reqwest::StatusCode;
use thiserror::Error;

/// Failures at the league API boundary
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to reach {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx response; `message` is the server's `detail` when it sent one
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    #[error("Session expired, log in again")]
    SessionExpired,

    #[error("Failed to parse {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("At least one of {0} is required")]
    MissingFilter(&'static str),

    #[error("{0}")]
    Cache(String),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::SessionExpired => Some(StatusCode::UNAUTHORIZED),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Worth another attempt: the request may not have reached a healthy server
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Transport { .. } => true,
            ApiError::Status { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}

/// Builds a status error from an error body, preferring FastAPI-style `{"detail": "..."}`
pub fn status_error(status: StatusCode, body: &str) -> ApiError {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string));

    let message = detail.unwrap_or_else(|| {
        format!(
            "API error: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        )
        .trim_end()
        .to_string()
    });

    ApiError::Status { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_uses_detail() {
        let err = status_error(StatusCode::NOT_FOUND, r#"{"detail": "Match not found"}"#);
        assert_eq!(err.to_string(), "Match not found");
        assert!(err.is_not_found());
        assert!(!err.is_transient());
    }

    #[test]
    fn test_status_error_without_detail() {
        let err = status_error(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(err.to_string(), "API error: 502 Bad Gateway");
        assert!(err.is_transient());
    }

    #[test]
    fn test_session_expired_maps_to_unauthorized() {
        assert_eq!(ApiError::SessionExpired.status(), Some(StatusCode::UNAUTHORIZED));
    }
}
