//! Client Configuration
//!
//! Endpoint and session parameters, loaded from an optional TOML file at
//! `~/.config/hive/client.toml` with `HIVE_*` environment variable
//! overrides.
//!
//! # Configuration Priority
//!
//! Values are loaded with the following priority (highest first):
//! 1. Environment variables
//! 2. TOML configuration file
//! 3. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! endpoint = "ws://127.0.0.1:8000/ws-chat"
//! rest_base = "http://127.0.0.1:8000"
//!
//! [session]
//! max_autonomous_rounds = 4
//! temperature = 0.7
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest accepted autonomous-round cap
pub const MIN_AUTONOMOUS_ROUNDS: u8 = 2;

/// Largest accepted autonomous-round cap
pub const MAX_AUTONOMOUS_ROUNDS: u8 = 8;

/// Default autonomous-round cap
pub const DEFAULT_AUTONOMOUS_ROUNDS: u8 = 4;

/// Default sampling temperature forwarded to the agents
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default websocket endpoint for the conversation stream
pub const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:8000/ws-chat";

/// Default base URL for the REST companion API
pub const DEFAULT_REST_BASE: &str = "http://127.0.0.1:8000";

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("Failed to read config file at {path}: {source}")]
    Read {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Clamp a round cap into the accepted range
#[must_use]
pub fn clamp_rounds(rounds: u8) -> u8 {
    rounds.clamp(MIN_AUTONOMOUS_ROUNDS, MAX_AUTONOMOUS_ROUNDS)
}

/// Per-conversation parameters carried on every submission
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Agent rounds allowed between user turns
    pub max_autonomous_rounds: u8,

    /// Sampling temperature forwarded to the agents
    pub temperature: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_autonomous_rounds: DEFAULT_AUTONOMOUS_ROUNDS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl SessionConfig {
    /// Create a session configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the round cap, clamping into the accepted range
    #[must_use]
    pub fn with_max_autonomous_rounds(mut self, rounds: u8) -> Self {
        self.max_autonomous_rounds = clamp_rounds(rounds);
        self
    }

    /// Set the sampling temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Full client configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Websocket endpoint for the conversation stream
    pub endpoint: String,

    /// Base URL for the REST companion API
    pub rest_base: String,

    /// Session parameters
    pub session: SessionConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            rest_base: DEFAULT_REST_BASE.to_string(),
            session: SessionConfig::default(),
        }
    }
}

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/hive/client.toml` or `~/.config/hive/client.toml`
/// if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("hive").join("client.toml"))
}

impl ClientConfig {
    /// Load configuration from the default file location and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed. A missing config file is not an error (defaults are used).
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from_path(default_config_path())?;
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a specific path, without environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the specified config file cannot be read or parsed.
    pub fn load_from_path(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(ref config_path) = path {
            if config_path.exists() {
                let contents = std::fs::read_to_string(config_path).map_err(|e| {
                    ConfigError::Read {
                        path: config_path.clone(),
                        source: e,
                    }
                })?;
                config = toml::from_str(&contents)?;

                tracing::info!(
                    path = %config_path.display(),
                    "Loaded configuration from file"
                );
            } else {
                tracing::debug!(
                    path = %config_path.display(),
                    "Config file not found, using defaults"
                );
            }
        }

        config.session.max_autonomous_rounds =
            clamp_rounds(config.session.max_autonomous_rounds);
        Ok(config)
    }

    /// Create a configuration from environment variables alone
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Apply environment variable overrides
    ///
    /// Unparseable values are ignored and the current value kept.
    fn apply_env(&mut self) {
        if let Ok(endpoint) = std::env::var("HIVE_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Ok(base) = std::env::var("HIVE_REST_BASE") {
            self.rest_base = base;
        }
        if let Ok(rounds) = std::env::var("HIVE_AUTONOMOUS_ROUNDS") {
            if let Ok(n) = rounds.parse::<u8>() {
                self.session.max_autonomous_rounds = clamp_rounds(n);
            }
        }
        if let Ok(temperature) = std::env::var("HIVE_TEMPERATURE") {
            if let Ok(t) = temperature.parse::<f32>() {
                self.session.temperature = t;
            }
        }
    }
}
