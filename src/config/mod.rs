//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding the FACEIT Data API key.
pub const API_KEY_ENV: &str = "FACEIT_API_KEY";

/// Environment variable overriding the FACEIT Data API base URL.
pub const API_BASE_ENV: &str = "FACEIT_API_BASE";

/// Largest page size the stats endpoint accepts.
pub const MAX_MATCH_LIMIT: u32 = 100;

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

/// FACEIT Data API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceitConfig {
    /// Base URL of the Data API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Bearer token; usually supplied through `FACEIT_API_KEY`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Concurrent player fetches per analysis (None = derived from CPU count)
    #[serde(default)]
    pub max_concurrency: Option<usize>,
}

fn default_api_base() -> String {
    "https://open.faceit.com/data/v4".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for FaceitConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: None,
            timeout_seconds: default_timeout(),
            max_concurrency: None,
        }
    }
}

impl FaceitConfig {
    /// Worker pool size for player fetches.
    ///
    /// Defaults to `min(32, cpus + 4)`.
    pub fn concurrency(&self) -> usize {
        self.max_concurrency.unwrap_or_else(|| {
            let cpus = std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1);
            (cpus + 4).min(32)
        })
    }
}

/// Match-history window sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Matches per player for the "recent" window
    #[serde(default = "default_recent_matches")]
    pub recent_matches: u32,

    /// Matches per player for the "all time" window
    #[serde(default = "default_all_time_matches")]
    pub all_time_matches: u32,
}

fn default_recent_matches() -> u32 {
    20
}

fn default_all_time_matches() -> u32 {
    MAX_MATCH_LIMIT
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            recent_matches: default_recent_matches(),
            all_time_matches: default_all_time_matches(),
        }
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

    /// Directory served under `/static`
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origin() -> String {
    "*".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("./static")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
            static_dir: default_static_dir(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub faceit: FaceitConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            faceit: FaceitConfig::default(),
            analysis: AnalysisConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise start from defaults, then
    /// apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Override settings from environment variables, looked up through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.is_empty()) {
            self.faceit.api_key = Some(key);
        }
        if let Some(base) = lookup(API_BASE_ENV).filter(|b| !b.is_empty()) {
            self.faceit.api_base = base;
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.faceit.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "FACEIT timeout must be greater than 0".to_string(),
            ));
        }

        if self.faceit.max_concurrency == Some(0) {
            return Err(ConfigError::ValidationError(
                "max_concurrency must be greater than 0".to_string(),
            ));
        }

        for (name, value) in [
            ("recent_matches", self.analysis.recent_matches),
            ("all_time_matches", self.analysis.all_time_matches),
        ] {
            if value == 0 || value > MAX_MATCH_LIMIT {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be between 1 and {}, got {}",
                    name, MAX_MATCH_LIMIT, value
                )));
            }
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
