//! Configuration file loading and environment resolution
//!
//! Tests cover:
//! - Missing TOML files SHALL NOT cause termination
//! - Malformed TOML falls back to defaults
//! - TOML values are picked up, including the `[logging]` table
//! - Process environment overrides TOML
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate process environment variables are marked with #[serial].

use lpal_common::config::{
    load_toml_config, load_toml_config_or_default, CliOverrides, ServerConfig, TomlConfig,
    ENV_GEMINI_API_KEY, ENV_GEMINI_MODEL, ENV_PORT,
};
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, content).expect("Should write config file");
    path
}

#[test]
fn test_missing_explicit_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");

    let config = load_toml_config_or_default(Some(&missing));
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_malformed_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "port = \"not a number\"\n[[[");

    assert!(load_toml_config(&path).is_err());
    assert_eq!(load_toml_config_or_default(Some(&path)), TomlConfig::default());
}

#[test]
fn test_full_file_parsed() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
bind_address = "127.0.0.1"
port = 8088
session_secret = "file-secret"
session_max_age_days = 7
gemini_api_key = "file-key"
gemini_model = "gemini-1.5-flash"

[logging]
level = "debug"
"#,
    );

    let config = load_toml_config(&path).unwrap();
    assert_eq!(config.bind_address.as_deref(), Some("127.0.0.1"));
    assert_eq!(config.port, Some(8088));
    assert_eq!(config.session_max_age_days, Some(7));
    assert_eq!(config.logging.level.as_deref(), Some("debug"));
}

#[test]
fn test_partial_file_parsed() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "gemini_model = \"gemini-2.0-flash-exp\"\n");

    let config = load_toml_config(&path).unwrap();
    assert_eq!(config.gemini_model.as_deref(), Some("gemini-2.0-flash-exp"));
    assert!(config.port.is_none());
    assert!(config.logging.level.is_none());
}

#[test]
#[serial]
fn test_process_env_overrides_toml() {
    env::set_var(ENV_GEMINI_MODEL, "env-model");
    env::set_var(ENV_PORT, "6123");
    env::remove_var(ENV_GEMINI_API_KEY);

    let toml = TomlConfig {
        gemini_model: Some("toml-model".into()),
        gemini_api_key: Some("toml-key".into()),
        port: Some(7000),
        ..Default::default()
    };
    let config = ServerConfig::resolve(&CliOverrides::default(), &toml).unwrap();

    assert_eq!(config.gemini_model, "env-model");
    assert_eq!(config.port, 6123);
    assert_eq!(config.require_gemini_api_key().unwrap(), "toml-key");

    env::remove_var(ENV_GEMINI_MODEL);
    env::remove_var(ENV_PORT);
}

#[test]
#[serial]
fn test_missing_api_key_error_explains_setup() {
    env::remove_var(ENV_GEMINI_API_KEY);

    let config = ServerConfig::resolve(&CliOverrides::default(), &TomlConfig::default()).unwrap();
    let err = config.require_gemini_api_key().unwrap_err();
    assert!(err.to_string().contains(ENV_GEMINI_API_KEY));
}
