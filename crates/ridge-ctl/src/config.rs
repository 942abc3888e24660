//! Configuration for ridge-ctl.
//!
//! Resolution order: environment variables → config file → defaults.
//!
//! Config file location:
//!   1. $RIDGE_CONFIG (explicit override)
//!   2. $XDG_CONFIG_HOME/ridge/config.toml
//!   3. ~/.config/ridge/config.toml

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RidgeConfig {
    pub log: LogConfig,
    pub output: OutputConfig,
    pub input: InputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// tracing EnvFilter directive. RUST_LOG wins when set.
    pub filter: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Hex,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub uppercase_hex: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Largest single argument read from a file or stdin.
    pub max_bytes: u64,
}

// ── Defaults ──────────────────────────────────────────────────────────────────

impl Default for RidgeConfig {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            output: OutputConfig::default(),
            input: InputConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Hex,
            uppercase_hex: false,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_bytes: 16 * 1024 * 1024,
        }
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_or_home().join(".config"))
        .join("ridge")
}

fn dirs_or_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
    #[error("failed to write {0}: {1}")]
    WriteFailed(PathBuf, std::io::Error),
    #[error("failed to serialize: {0}")]
    SerializeFailed(toml::ser::Error),
    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl RidgeConfig {
    /// Load config: env vars → file → defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::file_path();
        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            RidgeConfig::default()
        };
        config.apply_overrides(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadFailed(path.to_path_buf(), e))?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(path.to_path_buf(), e))
    }

    /// Config file path.
    pub fn file_path() -> PathBuf {
        std::env::var("RIDGE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| config_dir().join("config.toml"))
    }

    /// Write default config if none exists. Returns the path.
    pub fn write_default_if_missing() -> Result<PathBuf, ConfigError> {
        let path = Self::file_path();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
            }
            let text = RidgeConfig::default().to_toml()?;
            std::fs::write(&path, text).map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
        }
        Ok(path)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::SerializeFailed)
    }

    /// Apply RIDGE_* overrides. `lookup` is the environment in production
    /// and a map in tests.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("RIDGE_LOG__FILTER") {
            self.log.filter = v;
        }
        if let Some(v) = lookup("RIDGE_OUTPUT__FORMAT") {
            self.output.format = match v.to_ascii_lowercase().as_str() {
                "hex" => OutputFormat::Hex,
                "json" => OutputFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        var: "RIDGE_OUTPUT__FORMAT",
                        value: v,
                    })
                }
            };
        }
        if let Some(v) = lookup("RIDGE_OUTPUT__UPPERCASE_HEX") {
            self.output.uppercase_hex = v == "true" || v == "1";
        }
        if let Some(v) = lookup("RIDGE_INPUT__MAX_BYTES") {
            self.input.max_bytes = v.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "RIDGE_INPUT__MAX_BYTES",
                value: v.clone(),
            })?;
        }
        Ok(())
    }
}
