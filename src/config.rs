//! Scraper settings loaded from an optional YAML file.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration aimed at `https://habr.com`. Command-line flags are
//! applied on top of the loaded values in `main`.
//!
//! ```yaml
//! base_url: https://habr.com
//! request_timeout_secs: 30
//! page_delay_ms: 2000
//! retry_statuses: [429, 503]
//! ```

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;
use tracing::{info, instrument};

pub const DEFAULT_BASE_URL: &str = "https://habr.com";
pub const DEFAULT_SEARCH_PATH: &str = "/ru/search/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";
pub const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "ru-RU,ru;q=0.9,en-US;q=0.8,en;q=0.7";

/// Network and pacing settings of the scraper.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Origin that search URLs are built on and relative links resolve against.
    pub base_url: String,
    /// Path of the search endpoint, joined to `base_url`.
    pub search_path: String,
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    /// Per-request timeout.
    pub request_timeout_secs: u64,
    /// Pause after each results page.
    pub page_delay_ms: u64,
    /// Pause after each full-text fetch.
    pub article_delay_ms: u64,
    /// Pause before retrying a page that failed with a retryable status.
    pub retry_delay_ms: u64,
    /// HTTP statuses worth one retry of the same page.
    pub retry_statuses: Vec<u16>,
    /// Upper bound of the random jitter added to the politeness pauses.
    pub politeness_jitter_ms: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            search_path: DEFAULT_SEARCH_PATH.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            request_timeout_secs: 20,
            page_delay_ms: 1000,
            article_delay_ms: 500,
            retry_delay_ms: 5000,
            retry_statuses: vec![429, 503],
            politeness_jitter_ms: 250,
        }
    }
}

impl ScraperConfig {
    /// Parse a configuration from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, Box<dyn Error>> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a configuration file.
    #[instrument(level = "info")]
    pub async fn load(path: &str) -> Result<Self, Box<dyn Error>> {
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("failed to read config {path}: {e}"))?;
        let config =
            Self::from_yaml(&yaml).map_err(|e| format!("invalid config {path}: {e}"))?;
        info!(base_url = %config.base_url, "Loaded scraper configuration");
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn article_delay(&self) -> Duration {
        Duration::from_millis(self.article_delay_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn is_retryable(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// Configuration with every pause set to zero, for tests against a local server.
    #[cfg(test)]
    pub fn without_delays(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            request_timeout_secs: 5,
            page_delay_ms: 0,
            article_delay_ms: 0,
            retry_delay_ms: 0,
            politeness_jitter_ms: 0,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = ScraperConfig::from_yaml("").unwrap();
        assert_eq!(config, ScraperConfig::default());
        assert_eq!(config.base_url, "https://habr.com");
        assert_eq!(config.request_timeout(), Duration::from_secs(20));
    }

    #[test]
    fn test_partial_yaml_overrides_only_given_fields() {
        let config = ScraperConfig::from_yaml(
            "request_timeout_secs: 45\nretry_statuses: [429]\npage_delay_ms: 2000\n",
        )
        .unwrap();

        assert_eq!(config.request_timeout_secs, 45);
        assert_eq!(config.page_delay(), Duration::from_secs(2));
        assert!(config.is_retryable(429));
        assert!(!config.is_retryable(503));
        assert_eq!(config.search_path, DEFAULT_SEARCH_PATH);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(ScraperConfig::from_yaml("request_timeout_secs: soon").is_err());
    }

    #[test]
    fn test_redirects_are_not_retried_by_default() {
        let config = ScraperConfig::default();
        assert!(!config.is_retryable(301));
        assert!(!config.is_retryable(399));
        assert!(config.is_retryable(503));
    }

    #[tokio::test]
    async fn test_load_reports_missing_file() {
        let err = ScraperConfig::load("/definitely/not/here.yaml")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.yaml"));
    }

    #[tokio::test]
    async fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scraper.yaml");
        std::fs::write(&path, "base_url: http://localhost:8080\n").unwrap();

        let config = ScraperConfig::load(path.to_str().unwrap()).await.unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.article_delay(), Duration::from_millis(500));
    }
}
