//! Configuration management for the metadata clients.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable that overrides `mal.client_id`
pub const MAL_CLIENT_ID_ENV: &str = "MAL_CLIENT_ID";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// MyAnimeList REST API settings
    #[serde(default)]
    pub mal: MalConfig,

    /// AniList GraphQL API settings
    #[serde(default)]
    pub anilist: AnilistConfig,

    /// HTTP transport settings shared by both clients
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// MyAnimeList API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MalConfig {
    /// API base URL
    pub base_url: String,

    /// Client id sent in the `X-MAL-CLIENT-ID` header
    pub client_id: String,

    /// Fields requested when looking up a single anime
    pub default_fields: String,

    /// Fields requested by search, ranking and seasonal listings
    pub list_fields: String,
}

/// AniList API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnilistConfig {
    /// GraphQL endpoint
    pub api_url: String,
}

/// HTTP transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// User-Agent header value
    pub user_agent: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log directory path
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

impl Default for MalConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.myanimelist.net/v2/".to_string(),
            client_id: String::new(),
            default_fields: "id,title,main_picture,alternative_titles,start_date,end_date,nsfw,genres,status,media_type,broadcast".to_string(),
            list_fields: "id,title,main_picture,alternative_titles,start_date".to_string(),
        }
    }
}

impl Default for AnilistConfig {
    fn default() -> Self {
        Self {
            api_url: "https://graphql.anilist.co".to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("moe-meta/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            default_level: "info".to_string(),
            console: true,
            file: false,
            json_format: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Load configuration from a TOML file or create default if not found
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::from_file(path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load config, using defaults");
            Self::default()
        })
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }

    /// Override the MAL client id from `MAL_CLIENT_ID` when it is set
    pub fn apply_env(self) -> Self {
        self.apply_client_id(std::env::var(MAL_CLIENT_ID_ENV).ok())
    }

    fn apply_client_id(mut self, client_id: Option<String>) -> Self {
        if let Some(id) = client_id.filter(|id| !id.trim().is_empty()) {
            tracing::debug!("Using MAL client id from environment");
            self.mal.client_id = id;
        }
        self
    }
}
