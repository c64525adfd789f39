use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub user_agent: &'static str,
    pub timeout_secs: u64,
    /// Extra attempts for reads after a transport error or 5xx
    pub retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            user_agent: "PoolLeague/0.1",
            timeout_secs: 30,
            retries: 1,
            retry_delay_ms: 250,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub stale_time: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(5 * 60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub token_path: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            token_path: ".opl_auth_token".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub cache: CacheSettings,
    pub auth: AuthSettings,
}

impl AppConfig {
    /// Defaults, overridden by `OPL_API_BASE`, `OPL_TOKEN_PATH` and `OPL_STALE_SECS`.
    pub fn new() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup("OPL_API_BASE") {
            config.api.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(path) = lookup("OPL_TOKEN_PATH") {
            config.auth.token_path = path;
        }
        match lookup("OPL_STALE_SECS").map(|s| s.parse::<u64>()) {
            Some(Ok(secs)) => config.cache.stale_time = Duration::from_secs(secs),
            Some(Err(_)) => log::warn!("Ignoring OPL_STALE_SECS: not a number of seconds"),
            None => {}
        }

        config
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.api.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.retries, 1);
        assert_eq!(config.cache.stale_time, Duration::from_secs(300));
        assert_eq!(config.auth.token_path, ".opl_auth_token");
    }

    #[test]
    fn test_environment_overrides() {
        let env: HashMap<&str, &str> = [
            ("OPL_API_BASE", "https://league.example.com/"),
            ("OPL_TOKEN_PATH", "/tmp/token"),
            ("OPL_STALE_SECS", "30"),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "https://league.example.com");
        assert_eq!(config.auth.token_path, "/tmp/token");
        assert_eq!(config.cache.stale_time, Duration::from_secs(30));
    }

    #[test]
    fn test_bad_stale_time_keeps_default() {
        let config = AppConfig::from_lookup(|key| (key == "OPL_STALE_SECS").then(|| "soon".to_string()));
        assert_eq!(config.cache.stale_time, Duration::from_secs(300));
    }
}
