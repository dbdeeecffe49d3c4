//! Configuration module - interpreter, script and server settings
//!
//! This module provides functionality for:
//! - Loading configuration from ~/.quickstart/config.json
//! - Default values for all settings
//! - Type definitions for config structures
//!
//! # Module Structure
//!
//! - `defaults` - All default constant values
//! - `types` - Configuration struct definitions (Config, InterpreterConfig, etc.)
//! - `loader` - File system loading, parsing and environment overrides

mod defaults;
mod loader;
mod types;

pub use defaults::{DEFAULT_CONFIG_PATH, DEFAULT_PROBE_URL};

pub use types::{Config, InterpreterConfig, InvocationStyle, ProbeConfig, ServerConfig};

pub use loader::{apply_env_overrides, load_config, load_config_from};

#[cfg(test)]
pub use defaults::{
    DEFAULT_HOST, DEFAULT_INTERPRETER, DEFAULT_PORT, DEFAULT_PROBE_TIMEOUT_SECONDS,
    DEFAULT_SCRIPT_NAME,
};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
