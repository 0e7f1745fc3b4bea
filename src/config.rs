// src/config.rs

//! Application configuration structures.
//!
//! Loaded once at startup from a TOML file; never reloaded mid-run.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Environment variable that overrides `sink.webhook_url`, so credentials
/// can stay out of the config file.
pub const WEBHOOK_URL_ENV: &str = "FIREWATCH_WEBHOOK_URL";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Feed endpoint and HTTP behavior settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Poll loop settings
    #[serde(default)]
    pub poll: PollConfig,

    /// Notification sink settings
    #[serde(default)]
    pub sink: SinkConfig,

    /// Watermark persistence settings
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.apply_env();
        Ok(config)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            let mut config = Self::default();
            config.apply_env();
            config
        })
    }

    /// Apply environment overrides.
    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(WEBHOOK_URL_ENV) {
            if !url.trim().is_empty() {
                self.sink.webhook_url = url;
            }
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.feed.base_url.trim().is_empty() {
            return Err(AppError::config("feed.base_url is empty"));
        }
        url::Url::parse(&self.feed.base_url)
            .map_err(|e| AppError::config(format!("feed.base_url is invalid: {e}")))?;
        if self.feed.status_ids.is_empty() {
            return Err(AppError::config("feed.status_ids is empty"));
        }
        if self.feed.timeout_secs == 0 {
            return Err(AppError::config("feed.timeout_secs must be > 0"));
        }
        if self.feed.user_agent.trim().is_empty() {
            return Err(AppError::config("feed.user_agent is empty"));
        }
        if self.poll.interval_secs == 0 {
            return Err(AppError::config("poll.interval_secs must be > 0"));
        }
        if self.poll.backoff_max_secs < self.poll.interval_secs {
            return Err(AppError::config(
                "poll.backoff_max_secs must be >= poll.interval_secs",
            ));
        }
        if self.sink.webhook_url.trim().is_empty() {
            return Err(AppError::config(format!(
                "sink.webhook_url is empty (set it in the config file or via {WEBHOOK_URL_ENV})"
            )));
        }
        if self.storage.watermark_path.trim().is_empty() {
            return Err(AppError::config("storage.watermark_path is empty"));
        }
        Ok(())
    }
}

/// Feed endpoint and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Report endpoint URL (query parameters are added per fetch)
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Region filter id (`krajId`)
    #[serde(default = "defaults::region_id")]
    pub region_id: u32,

    /// Incident state filter ids (`stavIds`)
    #[serde(default = "defaults::status_ids")]
    pub status_ids: Vec<u32>,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            region_id: defaults::region_id(),
            status_ids: defaults::status_ids(),
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Poll loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Steady-state delay between cycles in seconds
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,

    /// Cap for the failure backoff delay in seconds
    #[serde(default = "defaults::backoff_max")]
    pub backoff_max_secs: u64,

    /// On a true first run, record the newest timestamp as the watermark
    /// without delivering anything. Turning this off delivers the whole
    /// snapshot on first run.
    #[serde(default = "defaults::baseline_on_first_run")]
    pub baseline_on_first_run: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::interval(),
            backoff_max_secs: defaults::backoff_max(),
            baseline_on_first_run: defaults::baseline_on_first_run(),
        }
    }
}

/// Notification sink settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Discord webhook URL; overridable via `FIREWATCH_WEBHOOK_URL`
    #[serde(default)]
    pub webhook_url: String,

    /// Optional display name for posted messages
    #[serde(default)]
    pub username: Option<String>,

    /// Footer text shown under every message
    #[serde(default = "defaults::footer_text")]
    pub footer_text: String,

    /// Footer icon URL
    #[serde(default = "defaults::footer_icon_url")]
    pub footer_icon_url: String,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            username: None,
            footer_text: defaults::footer_text(),
            footer_icon_url: defaults::footer_icon_url(),
        }
    }
}

/// Watermark persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the watermark JSON file
    #[serde(default = "defaults::watermark_path")]
    pub watermark_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            watermark_path: defaults::watermark_path(),
        }
    }
}

mod defaults {
    // Feed defaults: the HZS Vysočina daily incident report
    pub fn base_url() -> String {
        "http://webohled.hasici-vysocina.cz/udalosti/reports/WP_PrehledUdalosti_XLS.crf".into()
    }
    pub fn region_id() -> u32 {
        108
    }
    pub fn status_ids() -> Vec<u32> {
        vec![
            210, 400, 410, 420, 430, 440, 500, 510, 520, 600, 610, 620, 700, 710, 750, 760, 780,
            800,
        ]
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; firewatch/1.0)".into()
    }

    // Poll defaults
    pub fn interval() -> u64 {
        61
    }
    pub fn backoff_max() -> u64 {
        900
    }
    pub fn baseline_on_first_run() -> bool {
        true
    }

    // Sink defaults
    pub fn footer_text() -> String {
        "HZS Vysočina Výjezdy".into()
    }
    pub fn footer_icon_url() -> String {
        "https://i.ibb.co/rHh4s6h/icon.jpg".into()
    }

    // Storage defaults
    pub fn watermark_path() -> String {
        "data/watermark.json".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.sink.webhook_url = "https://discord.com/api/webhooks/1/token".to_string();
        config
    }

    #[test]
    fn validate_accepts_defaults_with_webhook() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_webhook() {
        assert!(Config::default().validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_interval() {
        let mut config = valid_config();
        config.poll.interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_backoff_below_interval() {
        let mut config = valid_config();
        config.poll.backoff_max_secs = config.poll.interval_secs - 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_status_ids() {
        let mut config = valid_config();
        config.feed.status_ids.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let mut config = valid_config();
        config.feed.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [poll]
            interval_secs = 120

            [sink]
            webhook_url = "https://discord.com/api/webhooks/1/token"
            "#,
        )
        .unwrap();

        assert_eq!(config.poll.interval_secs, 120);
        assert!(config.poll.baseline_on_first_run);
        assert_eq!(config.feed.region_id, 108);
        assert_eq!(config.storage.watermark_path, "data/watermark.json");
    }
}
