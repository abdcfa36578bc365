//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Live data provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Central data GraphQL endpoint (series listings)
    #[serde(default = "default_central_url")]
    pub central_url: String,

    /// Live data feed GraphQL endpoint (series state)
    #[serde(default = "default_series_state_url")]
    pub series_state_url: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Response cache lifetime in seconds
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,

    /// Series states fetched per report
    #[serde(default = "default_max_series_states")]
    pub max_series_states: usize,

    /// Tournaments listed per team
    #[serde(default = "default_tournaments_per_team")]
    pub tournaments_per_team: usize,

    /// Page size of each tournament listing
    #[serde(default = "default_series_per_tournament")]
    pub series_per_tournament: usize,
}

fn default_central_url() -> String {
    "https://api-op.grid.gg/central-data/graphql".to_string()
}

fn default_series_state_url() -> String {
    "https://api-op.grid.gg/live-data-feed/series-state/graphql".to_string()
}

fn default_api_key_env() -> String {
    "GRID_API_KEY".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_cache_ttl() -> u64 {
    300
}

fn default_max_series_states() -> usize {
    5
}

fn default_tournaments_per_team() -> usize {
    2
}

fn default_series_per_tournament() -> usize {
    50
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            central_url: default_central_url(),
            series_state_url: default_series_state_url(),
            api_key_env: default_api_key_env(),
            timeout_seconds: default_timeout(),
            cache_ttl_seconds: default_cache_ttl(),
            max_series_states: default_max_series_states(),
            tournaments_per_team: default_tournaments_per_team(),
            series_per_tournament: default_series_per_tournament(),
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// The API key, if its environment variable is set and non-empty.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Report window bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_last_n")]
    pub default_last_n: usize,

    #[serde(default = "default_min_last_n")]
    pub min_last_n: usize,

    #[serde(default = "default_max_last_n")]
    pub max_last_n: usize,
}

fn default_last_n() -> usize {
    10
}

fn default_min_last_n() -> usize {
    5
}

fn default_max_last_n() -> usize {
    20
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            default_last_n: default_last_n(),
            min_last_n: default_min_last_n(),
            max_last_n: default_max_last_n(),
        }
    }
}

impl ReportConfig {
    pub fn accepts(&self, last_n: usize) -> bool {
        (self.min_last_n..=self.max_last_n).contains(&last_n)
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            provider: ProviderConfig::default(),
            server: ServerConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &PathBuf) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Provider timeout must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        let report = &self.report;
        if report.min_last_n > report.max_last_n {
            return Err(ConfigError::ValidationError(format!(
                "min_last_n ({}) exceeds max_last_n ({})",
                report.min_last_n, report.max_last_n
            )));
        }

        if !report.accepts(report.default_last_n) {
            return Err(ConfigError::ValidationError(format!(
                "default_last_n ({}) must be within {}..={}",
                report.default_last_n, report.min_last_n, report.max_last_n
            )));
        }

        Ok(())
    }
}
