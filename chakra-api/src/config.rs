use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chakra_core::SessionConfig;
use tracing::warn;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Validation(String),
}

/// Delays between automatic turn steps, in milliseconds.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Pause before a computer player moves.
    pub computer_think_ms: u64,
    /// Pause between an applied move and the next player's turn.
    pub turn_advance_ms: u64,
    /// Pause before a stuck computer player passes.
    pub pass_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        PacingConfig {
            computer_think_ms: 500,
            turn_advance_ms: 1500,
            pass_ms: 500,
        }
    }
}

impl PacingConfig {
    #[inline]
    pub fn computer_think(&self) -> Duration {
        Duration::from_millis(self.computer_think_ms)
    }

    #[inline]
    pub fn turn_advance(&self) -> Duration {
        Duration::from_millis(self.turn_advance_ms)
    }

    #[inline]
    pub fn pass(&self) -> Duration {
        Duration::from_millis(self.pass_ms)
    }
}

/// Server configuration, loadable from TOML.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address.
    pub bind: String,
    pub pacing: PacingConfig,
    /// Game started when the server boots.
    pub session: SessionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: "0.0.0.0:8000".to_string(),
            pacing: PacingConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

/// Longest delay accepted for any pacing step.
const MAX_DELAY_MS: u64 = 60_000;

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: ServerConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        let pacing = [
            ("pacing.computer_think_ms", self.pacing.computer_think_ms),
            ("pacing.turn_advance_ms", self.pacing.turn_advance_ms),
            ("pacing.pass_ms", self.pacing.pass_ms),
        ];
        for (name, value) in pacing {
            if value > MAX_DELAY_MS {
                return Err(ConfigError::Validation(format!(
                    "{} must be <= {}",
                    name, MAX_DELAY_MS
                )));
            }
        }
        self.session
            .validate()
            .map_err(|e| ConfigError::Validation(format!("session: {}", e)))?;
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|_| ConfigError::Validation(format!("bind '{}' is not a socket address", self.bind)))
    }
}
