//! read client configuration from a file, the environment, or explicit values

use std::path::Path;
use std::time::Duration;

use reqwest::Client;

use crate::errors::Error;

pub const DEFAULT_USER_AGENT: &str = "bookshelf-client-rust/0.1.0";

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Config {
    /// Base URL of the bookshelf API, e.g. `http://localhost:8000`.
    pub base_url: String,
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(default = "default_logout_path")]
    pub logout_path: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_refresh_path() -> String {
    "auth/refresh".to_string()
}

fn default_login_path() -> String {
    "auth/login".to_string()
}

fn default_logout_path() -> String {
    "auth/logout".to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Config {
    pub fn from_values(base_url: impl Into<String>, timeout_secs: Option<u64>) -> Self {
        Self {
            base_url: base_url.into(),
            refresh_path: default_refresh_path(),
            login_path: default_login_path(),
            logout_path: default_logout_path(),
            user_agent: default_user_agent(),
            timeout_secs,
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// # ENV Vars
    /// * `BOOKSHELF_URL` - Base URL of the bookshelf API (required)
    /// * `BOOKSHELF_TIMEOUT_SECS` - Per-request timeout in seconds (optional)
    pub fn from_env() -> Result<Self, Error> {
        let base_url = std::env::var("BOOKSHELF_URL")
            .map_err(|_| Error::Config("Missing BOOKSHELF_URL env var".to_string()))?;
        let timeout_secs = match std::env::var("BOOKSHELF_TIMEOUT_SECS") {
            Ok(raw) => Some(raw.parse::<u64>().map_err(|e| {
                Error::Config(format!("Invalid BOOKSHELF_TIMEOUT_SECS '{}': {}", raw, e))
            })?),
            Err(_) => None,
        };
        Ok(Self::from_values(base_url, timeout_secs))
    }

    /// Returns the base URL with a scheme and without a trailing slash.
    pub fn normalized_base_url(&self) -> Result<String, Error> {
        let base = if self.base_url.contains("://") {
            self.base_url.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", self.base_url.trim_end_matches('/'))
        };
        reqwest::Url::parse(&base)
            .map_err(|e| Error::Config(format!("Invalid base URL '{}': {}", base, e)))?;
        Ok(base)
    }

    pub(crate) fn http_client(&self) -> Result<Client, Error> {
        let mut builder = Client::builder().user_agent(self.user_agent.as_str());
        if let Some(secs) = self.timeout_secs {
            if secs == 0 {
                return Err(Error::Config("timeout_secs must be greater than 0".to_string()));
            }
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_http_scheme() {
        let cfg = Config::from_values("localhost:8000/", None);
        assert_eq!(
            cfg.normalized_base_url().unwrap(),
            "http://localhost:8000"
        );
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let cfg = Config::from_values("http://", None);
        match cfg.normalized_base_url() {
            Err(Error::Config(msg)) => assert!(msg.contains("Invalid base URL")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn file_config_fills_in_default_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"base_url": "https://books.example", "timeout_secs": 5}"#)
            .unwrap();

        let cfg = Config::from_file(&path).unwrap();
        assert_eq!(cfg.refresh_path, "auth/refresh");
        assert_eq!(cfg.login_path, "auth/login");
        assert_eq!(cfg.logout_path, "auth/logout");
        assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(cfg.timeout_secs, Some(5));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let cfg = Config::from_values("http://localhost:8000", Some(0));
        assert!(matches!(cfg.http_client(), Err(Error::Config(_))));
    }
}
