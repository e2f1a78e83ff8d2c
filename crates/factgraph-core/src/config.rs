//! factgraph Configuration Management
//!
//! Handles configuration from environment variables and TOML config files
//! with sensible defaults for local development.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Parse service configuration
    pub parser: ParserConfig,

    /// Span normalization settings
    pub normalizer: NormalizerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Parser
        if let Ok(url) = std::env::var("FACTGRAPH_PARSER_URL") {
            config.parser.endpoint = url;
        }
        if let Ok(secs) = std::env::var("FACTGRAPH_PARSER_TIMEOUT_SECS") {
            config.parser.timeout_secs = parse_var("FACTGRAPH_PARSER_TIMEOUT_SECS", secs)?;
        }

        // Normalizer
        if let Ok(max_len) = std::env::var("FACTGRAPH_MAX_SPAN_TOKENS") {
            config.normalizer.max_len = parse_var("FACTGRAPH_MAX_SPAN_TOKENS", max_len)?;
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            config.logging.json_format = format.eq_ignore_ascii_case("json");
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::ParseError { message, .. } => ConfigError::ParseError { path, message },
            other => other,
        })
    }

    /// Parse TOML content
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: PathBuf::from("<inline>"),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        let env_config = Self::from_env()?;

        // Only override if env values differ from defaults
        if env_config.parser.endpoint != ParserConfig::default().endpoint {
            self.parser.endpoint = env_config.parser.endpoint;
        }
        if env_config.parser.timeout_secs != ParserConfig::default().timeout_secs {
            self.parser.timeout_secs = env_config.parser.timeout_secs;
        }
        if env_config.normalizer.max_len != NormalizerConfig::default().max_len {
            self.normalizer.max_len = env_config.normalizer.max_len;
        }
        if env_config.logging.level != LoggingConfig::default().level {
            self.logging.level = env_config.logging.level;
        }
        if env_config.logging.json_format {
            self.logging.json_format = true;
        }

        Ok(self)
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.normalizer.max_len == 0 {
            return Err(ConfigError::InvalidValue {
                key: "normalizer.max_len".to_string(),
                value: "0".to_string(),
            });
        }
        if self.parser.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "parser.timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    })
}

/// Parse service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// URL of the parse endpoint
    pub endpoint: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8090/parse".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Span normalization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Maximum number of tokens kept in a subject or object span
    pub max_len: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self { max_len: 8 }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
