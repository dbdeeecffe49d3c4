//! Configuration loading from file system
//!
//! Handles reading config.json and layering environment overrides on top.

use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use super::defaults::{DEFAULT_CONFIG_PATH, ENV_INTERPRETER, ENV_PORT, ENV_SCRIPT};
use super::types::Config;
use crate::error::QuickStartError;

/// Load configuration from ~/.quickstart/config.json, then apply environment overrides.
///
/// Returns `Config::default()` (plus overrides) if the file is missing or invalid.
#[instrument(name = "load_config")]
pub fn load_config() -> Config {
    let config_path = PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_PATH).as_ref());
    let mut config = load_config_from(&config_path);
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

/// Load configuration from an explicit path without environment overrides.
pub fn load_config_from(config_path: &Path) -> Config {
    if !config_path.exists() {
        info!(path = %config_path.display(), "Config file not found, using defaults");
        return Config::default();
    }

    let contents = match std::fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!(path = %config_path.display(), error = %e, "Failed to read config, using defaults");
            return Config::default();
        }
    };

    match serde_json::from_str::<Config>(&contents) {
        Ok(config) => {
            info!(path = %config_path.display(), "Successfully loaded config");
            config
        }
        Err(e) => {
            let hint = if e.to_string().contains("unknown variant") {
                "\n\nHint: invocationStyle must be \"scriptFile\" or \"dotSource\"."
            } else {
                ""
            };
            let err = QuickStartError::Config(format!("{}{}", e, hint));
            warn!(
                path = %config_path.display(),
                error = %err.user_message(),
                "Failed to parse config JSON, using defaults"
            );
            Config::default()
        }
    }
}

/// Apply environment overrides. `lookup` is injectable so tests don't touch the process env.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(script) = lookup(ENV_SCRIPT).filter(|s| !s.trim().is_empty()) {
        let expanded = shellexpand::tilde(script.trim()).into_owned();
        config.script_path = Some(PathBuf::from(expanded));
    }

    if let Some(program) = lookup(ENV_INTERPRETER).filter(|s| !s.trim().is_empty()) {
        config.interpreter.program = program.trim().to_string();
    }

    if let Some(port) = lookup(ENV_PORT) {
        match port.trim().parse::<u16>() {
            Ok(port) => config.server.port = port,
            Err(e) => warn!(value = %port, error = %e, "Ignoring invalid {}", ENV_PORT),
        }
    }
}
