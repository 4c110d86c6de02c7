//! Logging infrastructure for the metadata clients.
//!
//! Libraries only emit `tracing` events; applications embedding the clients
//! call [`init`] once to install a subscriber with console and/or rolling
//! file output.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::config::LoggingConfig;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log directory path
    pub log_dir: String,
    /// Component name (used for log file naming)
    pub component: String,
    /// Default log level
    pub default_level: Level,
    /// Enable console output
    pub console: bool,
    /// Enable file output
    pub file: bool,
    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            component: "moe-meta".to_string(),
            default_level: Level::INFO,
            console: true,
            file: false,
            json_format: false,
        }
    }
}

impl LogConfig {
    /// Build from the `[logging]` section of the config file
    ///
    /// Unknown level names fall back to `info`.
    pub fn from_settings(component: &str, settings: &LoggingConfig) -> Self {
        let default_level = settings.default_level.parse().unwrap_or(Level::INFO);
        Self {
            log_dir: settings.log_dir.clone(),
            component: component.to_string(),
            default_level,
            console: settings.console,
            file: settings.file,
            json_format: settings.json_format,
        }
    }

    /// Filter directives used when `RUST_LOG` is not set
    pub fn filter_directives(&self) -> String {
        format!(
            "shared={},mal_client={},anilist_client={},hyper=warn,reqwest=warn,h2=warn",
            self.default_level,
            self.default_level,
            self.default_level
        )
    }
}

/// Initialize logging with the given configuration
///
/// Sets up tracing with:
/// - Daily file rotation when file output is enabled
/// - Structured logging with contextual fields
/// - Module-specific log levels, overridable via `RUST_LOG`
/// - Optional JSON formatting
pub fn init(config: LogConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directives()));

    let mut layers = Vec::new();

    if config.console {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_span_events(FmtSpan::NONE)
            .with_writer(std::io::stdout)
            .boxed();
        layers.push(console_layer);
    }

    if config.file {
        let log_dir = Path::new(&config.log_dir);
        std::fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", config.log_dir))?;

        let file_appender = tracing_appender::rolling::daily(log_dir, &config.component);

        let file_layer = if config.json_format {
            fmt::layer()
                .json()
                .with_target(true)
                .with_level(true)
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(file_appender)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .with_span_events(FmtSpan::CLOSE)
                .with_writer(file_appender)
                .boxed()
        };

        layers.push(file_layer);
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::info!(
        component = %config.component,
        file = config.file,
        "Logging initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_logging_config() {
        let config = LogConfig::default();
        assert_eq!(config.component, "moe-meta");
        assert_eq!(config.default_level, Level::INFO);
        assert!(config.console);
        assert!(!config.file);
    }

    #[test]
    fn test_from_settings() {
        let settings = LoggingConfig {
            log_dir: "/tmp/moe".to_string(),
            default_level: "debug".to_string(),
            console: false,
            file: true,
            json_format: true,
        };
        let config = LogConfig::from_settings("moe-meta", &settings);
        assert_eq!(config.default_level, Level::DEBUG);
        assert_eq!(config.log_dir, "/tmp/moe");
        assert!(config.file);
        assert!(config.json_format);
    }

    #[test]
    fn test_from_settings_unknown_level() {
        let settings = LoggingConfig {
            default_level: "loud".to_string(),
            ..LoggingConfig::default()
        };
        let config = LogConfig::from_settings("moe-meta", &settings);
        assert_eq!(config.default_level, Level::INFO);
    }

    #[test]
    fn test_filter_directives() {
        let config = LogConfig {
            default_level: Level::WARN,
            ..LogConfig::default()
        };
        let directives = config.filter_directives();
        assert!(directives.starts_with("shared=WARN"));
        assert!(directives.contains("mal_client=WARN"));
        assert!(directives.contains("anilist_client=WARN"));
        assert!(!directives.contains("moe_meta"));
        assert!(EnvFilter::try_new(&directives).is_ok());
    }

    // The only test in this crate that installs the global subscriber
    #[test]
    fn test_init_with_file_output() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let log_dir = temp_dir.path().join("logs");

        let config = LogConfig {
            log_dir: log_dir.to_string_lossy().to_string(),
            component: "moe-meta-test".to_string(),
            console: false,
            file: true,
            json_format: true,
            ..Default::default()
        };

        init(config.clone())?;
        tracing::info!("written to the rolling file");

        assert!(log_dir.is_dir());
        let created = std::fs::read_dir(&log_dir)?
            .filter_map(|entry| entry.ok())
            .any(|entry| entry.file_name().to_string_lossy().starts_with("moe-meta-test"));
        assert!(created);

        // A second subscriber cannot be installed
        assert!(init(config).is_err());

        Ok(())
    }
}
