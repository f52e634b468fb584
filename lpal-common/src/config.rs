//! Configuration loading and resolution
//!
//! Each setting is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing or unreadable TOML file is not fatal: a warning is logged and
//! the remaining tiers are used.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::{Error, Result};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_SESSION_MAX_AGE_DAYS: u64 = 31;

pub const ENV_BIND_ADDRESS: &str = "LPAL_BIND_ADDRESS";
pub const ENV_PORT: &str = "PORT";
pub const ENV_SESSION_SECRET: &str = "SESSION_SECRET";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";
pub const ENV_LOG_LEVEL: &str = "LPAL_LOG_LEVEL";
pub const ENV_SESSION_MAX_AGE_DAYS: &str = "LPAL_SESSION_MAX_AGE_DAYS";

/// Contents of `config.toml`; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub session_secret: Option<String>,
    pub session_max_age_days: Option<u64>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[logging]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_file: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    /// None when no tier supplied a secret; the caller generates one
    pub session_secret: Option<String>,
    pub session_max_age: Duration,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub log_level: String,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_address", &self.bind_address)
            .field("port", &self.port)
            .field("session_secret", &self.session_secret.as_ref().map(|_| "<redacted>"))
            .field("session_max_age", &self.session_max_age)
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field("gemini_model", &self.gemini_model)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl ServerConfig {
    /// Resolve against the process environment
    pub fn resolve(cli: &CliOverrides, toml: &TomlConfig) -> Result<Self> {
        Self::resolve_with(cli, toml, |name| std::env::var(name).ok())
    }

    /// Resolve with an injectable environment lookup
    pub fn resolve_with<F>(cli: &CliOverrides, toml: &TomlConfig, lookup_env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |name: &str| lookup_env(name).filter(|v| is_set(v));

        let bind_address = first_set([
            cli.bind_address.clone(),
            env(ENV_BIND_ADDRESS),
            toml.bind_address.clone(),
        ])
        .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let port = match cli.port {
            Some(port) => port,
            None => match env(ENV_PORT) {
                Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                    Error::Config(format!("{} must be a port number ({}): {}", ENV_PORT, raw, e))
                })?,
                None => toml.port.unwrap_or(DEFAULT_PORT),
            },
        };

        let max_age_days = match env(ENV_SESSION_MAX_AGE_DAYS) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                Error::Config(format!(
                    "{} must be a whole number of days ({}): {}",
                    ENV_SESSION_MAX_AGE_DAYS, raw, e
                ))
            })?,
            None => toml
                .session_max_age_days
                .unwrap_or(DEFAULT_SESSION_MAX_AGE_DAYS),
        };

        let session_max_age = max_age_days
            .checked_mul(86_400)
            .map(Duration::from_secs)
            .ok_or_else(|| {
                Error::Config(format!(
                    "Session max age of {} days is too large",
                    max_age_days
                ))
            })?;

        let log_level = first_set([
            cli.log_level.clone(),
            env(ENV_LOG_LEVEL),
            toml.logging.level.clone(),
        ])
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            bind_address,
            port,
            session_secret: first_set([env(ENV_SESSION_SECRET), toml.session_secret.clone()]),
            session_max_age,
            gemini_api_key: first_set([env(ENV_GEMINI_API_KEY), toml.gemini_api_key.clone()]),
            gemini_model: first_set([env(ENV_GEMINI_MODEL), toml.gemini_model.clone()])
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            log_level,
        })
    }

    /// `host:port` for the listener
    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Gemini API key, or a configuration error explaining how to set one
    pub fn require_gemini_api_key(&self) -> Result<&str> {
        self.gemini_api_key.as_deref().ok_or_else(|| {
            Error::Config(format!(
                "Gemini API key not configured. Please configure using one of:\n\
                 1. Environment: {}=your-key-here\n\
                 2. TOML config: {} (gemini_api_key = \"your-key\")\n\
                 \n\
                 Obtain an API key at: https://aistudio.google.com/app/apikey",
                ENV_GEMINI_API_KEY,
                default_config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "config.toml".to_string())
            ))
        })
    }
}

/// Non-empty, non-whitespace value
fn is_set(value: &str) -> bool {
    !value.trim().is_empty()
}

fn first_set<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| is_set(value))
}

/// Platform config file location: `<config_dir>/languagepal/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("languagepal").join("config.toml"))
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))
}

/// Load the config file if present, otherwise defaults
///
/// An explicitly named file that cannot be read is reported with a warning;
/// the default location being absent is normal and only logged at info.
pub fn load_toml_config_or_default(explicit: Option<&Path>) -> TomlConfig {
    let (path, explicit) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => match default_config_path() {
            Some(path) => (path, false),
            None => return TomlConfig::default(),
        },
    };

    if !path.exists() {
        if explicit {
            warn!("Config file not found: {} (using defaults)", path.display());
        } else {
            info!("No config file at {} (using defaults)", path.display());
        }
        return TomlConfig::default();
    }

    match load_toml_config(&path) {
        Ok(config) => {
            info!("Loaded config file: {}", path.display());
            config
        }
        Err(e) => {
            warn!("Ignoring config file {}: {}", path.display(), e);
            TomlConfig::default()
        }
    }
}
