use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::settings::ApiSettings;
use crate::errors::{status_error, ApiError};

pub type Query = Vec<(&'static str, String)>;

/// JSON client for the league API: bearer auth, one retry on flaky reads
#[derive(Clone)]
pub struct ApiHttpClient {
    client: Client,
    base_url: String,
    retries: u32,
    retry_delay: Duration,
}

impl ApiHttpClient {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let client = Self::build_client(settings.user_agent, settings.timeout_secs)?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            retries: settings.retries,
            retry_delay: Duration::from_millis(settings.retry_delay_ms),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let mut attempt = 0;
        loop {
            let request = self.request(Method::GET, path, token).query(query);
            match self.execute(request, path).await {
                Err(e) if e.is_transient() && attempt < self.retries => {
                    attempt += 1;
                    warn!("GET {} failed ({}), retrying", path, e);
                    sleep(self.retry_delay).await;
                }
                result => return result,
            }
        }
    }

    pub async fn send<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let request = self.request(method, path, token).json(body);
        self.execute(request, path).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, path, token);
        self.execute::<serde_json::Value>(request, path).await.map(|_| ())
    }

    fn build_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
        Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder, path: &str) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|source| ApiError::Transport {
            url: self.url(path),
            source,
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| ApiError::Transport {
            url: self.url(path),
            source,
        })?;
        debug!("{} -> {}", path, status);

        if !status.is_success() {
            return Err(Self::classify_failure(status, path, &body));
        }

        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            what: format!("response from {}", path),
            source,
        })
    }

    // A 401 on an auth endpoint is a failed login, anywhere else the token went bad
    fn classify_failure(status: StatusCode, path: &str, body: &str) -> ApiError {
        if status == StatusCode::UNAUTHORIZED && !path.starts_with("/auth/") {
            ApiError::SessionExpired
        } else {
            status_error(status, body)
        }
    }
}
