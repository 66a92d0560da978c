use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::{Config, RESERVED_ENV_KEYS};
use crate::identity::validate_part;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/incogniterm/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("incogniterm").join("config.toml")
    }

    /// Loads configuration from the default config file.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Config::default());
        }

        Self::load_from(&path)
    }

    /// Loads an explicitly named config file. Unlike [`Config::load`], a
    /// missing file is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content).map_err(|err| match err {
            ConfigError::ParseError { source, .. } => ConfigError::ParseError {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parses and validates TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: PathBuf::new(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - Fixed identity parts use the same character rules as generated ones
    /// - `[env]` keys are well-formed and don't touch identity-controlled variables
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(user) = &self.identity.user {
            validate_part("user", user).map_err(|e| ConfigError::ValidationError {
                message: e.to_string(),
            })?;
        }
        if let Some(host) = &self.identity.host {
            validate_part("host", host).map_err(|e| ConfigError::ValidationError {
                message: e.to_string(),
            })?;
        }

        for key in self.env.keys() {
            if key.is_empty() || key.contains('=') || key.contains('\0') {
                return Err(ConfigError::ValidationError {
                    message: format!("Invalid environment variable name '{}'", key),
                });
            }
            if RESERVED_ENV_KEYS.contains(&key.as_str()) {
                return Err(ConfigError::ValidationError {
                    message: format!(
                        "Environment variable '{}' is controlled by the session and cannot be overridden",
                        key
                    ),
                });
            }
        }

        if let Some(path) = &self.shell.path {
            if path.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    message: "shell.path must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}
