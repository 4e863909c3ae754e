//! Configuration management for mongo-reply
//!
//! This module handles loading, parsing, and managing configuration:
//! - Configuration files (TOML format)
//! - Command-line overrides applied by the CLI
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::result::{LegacyErrorFields, ServerCapability};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Display configuration
    #[serde(default)]
    pub display: DisplayConfig,

    /// Legacy reply field names
    #[serde(default)]
    pub legacy: LegacyErrorFields,

    /// Server capability configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// Display and output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Output format (json, json-pretty, table)
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Compact JSON format (single-line)
    ///
    /// Suitable for: logging, piping to other tools
    Json,

    /// Pretty-printed JSON format (multi-line)
    ///
    /// Human-readable JSON with indentation and newlines.
    JsonPretty,

    /// Table format
    ///
    /// Counts and write errors as ASCII tables.
    Table,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Server the replies were captured from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server version string, e.g. "2.4.9"
    #[serde(default)]
    pub version: Option<String>,

    /// Server `maxWireVersion`; takes precedence over `version`
    #[serde(default)]
    pub max_wire_version: Option<i32>,
}

// Default value functions
fn default_format() -> OutputFormat {
    OutputFormat::JsonPretty
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    ///
    /// # Arguments
    /// * `content` - TOML document
    ///
    /// # Returns
    /// * `Result<Config>` - Parsed configuration or error
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Load configuration from a file
    ///
    /// # Arguments
    /// * `path` - Explicit config path; `None` uses [`Config::default_path`]
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration; defaults when the default
    ///   file does not exist, an error when an explicit file does not exist
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_path(), false),
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigError::FileNotFound(path.display().to_string()).into());
            }
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        tracing::debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - Path to default configuration file
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mongo-reply")
            .join("config.toml")
    }

    /// Serialize the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("legacy.error_field", &self.legacy.error_field),
            ("legacy.error_code_field", &self.legacy.error_code_field),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.clone(),
                }
                .into());
            }
        }

        if let Some(wire) = self.server.max_wire_version {
            if wire < 0 {
                return Err(ConfigError::InvalidValue {
                    field: "server.max_wire_version".to_string(),
                    value: wire.to_string(),
                }
                .into());
            }
        }

        Ok(())
    }
}

impl ServerConfig {
    /// Reply shape expected from the configured server
    pub fn capability(&self) -> ServerCapability {
        match self.max_wire_version {
            Some(wire) => ServerCapability::from_max_wire_version(wire),
            None => ServerCapability::from_server_version(self.version.as_deref()),
        }
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl OutputFormat {
    /// Check if format is JSON-based
    pub fn is_json(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::JsonPretty)
    }

    /// Parse a format name as used on the command line
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "pretty" => Some(OutputFormat::JsonPretty),
            "table" => Some(OutputFormat::Table),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReplyError;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.display.format, OutputFormat::JsonPretty);
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert_eq!(config.legacy.error_field, "errmsg");
        assert_eq!(config.legacy.error_code_field, "code");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            [legacy]
            error_field = "err"

            [server]
            version = "2.4.9"
            "#,
        )
        .unwrap();

        assert_eq!(config.legacy.error_field, "err");
        assert_eq!(config.legacy.error_code_field, "code");
        assert_eq!(config.display.format, OutputFormat::JsonPretty);
        assert_eq!(config.server.capability(), ServerCapability::Legacy);
    }

    #[test]
    fn test_wire_version_takes_precedence() {
        let server = ServerConfig {
            version: Some("2.4.9".to_string()),
            max_wire_version: Some(3),
        };
        assert_eq!(server.capability(), ServerCapability::WriteCommands);
        assert_eq!(ServerConfig::default().capability(), ServerCapability::Legacy);
    }

    #[test]
    fn test_format_names() {
        let config = Config::from_toml_str("[display]\nformat = \"table\"\n").unwrap();
        assert_eq!(config.display.format, OutputFormat::Table);
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("json-pretty"), Some(OutputFormat::JsonPretty));
        assert_eq!(OutputFormat::parse("csv"), None);
        assert!(OutputFormat::Json.is_json());
        assert!(!OutputFormat::Table.is_json());
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml_str("[display\n").unwrap_err();
        assert!(matches!(err, ReplyError::Config(ConfigError::InvalidFormat(_))));
    }

    #[test]
    fn test_validate_rejects_empty_field_names() {
        let mut config = Config::default();
        config.legacy.error_code_field = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_missing_file() {
        let err = Config::load_from_file(Some(Path::new("/nonexistent/config.toml"))).unwrap_err();
        assert!(matches!(err, ReplyError::Config(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_toml_round_trip_of_defaults() {
        let config = Config::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }
}
