use crate::model::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Only the Chromium backend reads these.
#[cfg_attr(not(feature = "chromium"), allow(dead_code))]
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    #[serde(default = "default_headless")]
    pub headless: bool,
    /// Chrome/Chromium binary; autodetected when absent.
    #[serde(default)]
    pub executable: Option<PathBuf>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            executable: None,
        }
    }
}

/// Greenhouse board as written in the config file. Exactly one of
/// `board_token` or `board_url` must be set.
#[derive(Debug, Clone, Deserialize)]
pub struct GreenhouseSource {
    #[serde(default)]
    pub board_token: Option<String>,
    #[serde(default)]
    pub board_url: Option<String>,
    #[serde(default = "default_true")]
    pub content: bool,
    #[serde(default = "default_api_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreenhouseQuery {
    pub board_token: String,
    pub content: bool,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GoogleCareersQuery {
    #[serde(default = "default_keyword")]
    pub keyword: String,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Guard against pagination that never ends.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    #[serde(default = "default_browser_timeout")]
    pub timeout_seconds: u64,
}

impl Default for GoogleCareersQuery {
    fn default() -> Self {
        Self {
            keyword: default_keyword(),
            locations: Vec::new(),
            max_results: default_max_results(),
            max_pages: default_max_pages(),
            timeout_seconds: default_browser_timeout(),
        }
    }
}

impl GoogleCareersQuery {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScrollBoardQuery {
    pub name: String,
    pub start_url: String,
    pub card_selector: String,
    #[serde(default)]
    pub consent_selector: Option<String>,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_browser_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_settle_millis")]
    pub settle_millis: u64,
    #[serde(default = "default_scroll_step")]
    pub scroll_step: f64,
}

impl ScrollBoardQuery {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_millis)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    Greenhouse(GreenhouseSource),
    GoogleCareers(GoogleCareersQuery),
    ScrollBoard(ScrollBoardQuery),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub browser: BrowserSettings,
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            browser: BrowserSettings::default(),
            sources: default_sources(),
        }
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    if config.sources.is_empty() {
        return Err(ConfigError::Invalid("no sources configured".into()));
    }
    Ok(config)
}

fn default_sources() -> Vec<SourceConfig> {
    vec![SourceConfig::GoogleCareers(GoogleCareersQuery {
        locations: vec!["California".into(), "United States".into()],
        ..GoogleCareersQuery::default()
    })]
}

fn default_headless() -> bool {
    true
}

fn default_true() -> bool {
    true
}

fn default_api_timeout() -> u64 {
    25
}

fn default_browser_timeout() -> u64 {
    60
}

fn default_keyword() -> String {
    "software engineer".into()
}

fn default_max_results() -> usize {
    100
}

fn default_max_pages() -> usize {
    50
}

fn default_settle_millis() -> u64 {
    1500
}

fn default_scroll_step() -> f64 {
    2400.0
}
