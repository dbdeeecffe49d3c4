//! Configuration type definitions
//!
//! This module contains all the struct and enum definitions for configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::defaults::*;

// ============================================
// INTERPRETER
// ============================================

/// How the external interpreter is launched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpreterConfig {
    /// Program name or path (default: powershell.exe on Windows, pwsh elsewhere)
    #[serde(default = "default_interpreter_program")]
    pub program: String,
    /// Flags placed before the command or file argument
    #[serde(default = "default_interpreter_flags")]
    pub flags: Vec<String>,
    /// Flag introducing an inline command (default: -Command)
    #[serde(default = "default_command_flag")]
    pub command_flag: String,
    /// Flag introducing a script file; None passes the path as the first argument
    #[serde(default = "default_file_flag")]
    pub file_flag: Option<String>,
}

fn default_interpreter_program() -> String {
    DEFAULT_INTERPRETER.to_string()
}
fn default_interpreter_flags() -> Vec<String> {
    DEFAULT_INTERPRETER_FLAGS
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_command_flag() -> String {
    DEFAULT_COMMAND_FLAG.to_string()
}
fn default_file_flag() -> Option<String> {
    Some(DEFAULT_FILE_FLAG.to_string())
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            program: default_interpreter_program(),
            flags: default_interpreter_flags(),
            command_flag: default_command_flag(),
            file_flag: default_file_flag(),
        }
    }
}

// ============================================
// INVOCATION STYLE
// ============================================

/// Which entry style of the automation script the action buttons use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InvocationStyle {
    /// Run the script file with the fixed named argument list and `-Action <id>`
    #[default]
    ScriptFile,
    /// Dot-source the script, apply the prelude, then call the function named by the action
    DotSource,
}

// ============================================
// PROBE
// ============================================

/// Reachability probe used by the login gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeConfig {
    #[serde(default = "default_probe_url")]
    pub url: String,
    #[serde(default = "default_probe_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_probe_url() -> String {
    DEFAULT_PROBE_URL.to_string()
}
fn default_probe_timeout_seconds() -> u64 {
    DEFAULT_PROBE_TIMEOUT_SECONDS
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            url: default_probe_url(),
            timeout_seconds: DEFAULT_PROBE_TIMEOUT_SECONDS,
        }
    }
}

// ============================================
// SERVER
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    /// 0 picks a free port at startup
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_open_browser")]
    pub open_browser: bool,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_open_browser() -> bool {
    DEFAULT_OPEN_BROWSER
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: default_host(),
            port: DEFAULT_PORT,
            open_browser: DEFAULT_OPEN_BROWSER,
        }
    }
}

// ============================================
// MAIN CONFIG
// ============================================

/// Top-level configuration, read from ~/.quickstart/config.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub interpreter: InterpreterConfig,
    /// Path to the automation script (default: next to the executable)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_path: Option<PathBuf>,
    #[serde(default)]
    pub invocation_style: InvocationStyle,
    /// Upper bound for a single action; None waits indefinitely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_timeout_seconds: Option<u64>,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub server: ServerConfig,
    /// Emit placeholder control objects in the dot-source prelude (default: true)
    #[serde(default = "default_control_shims")]
    pub control_shims: bool,
}

fn default_control_shims() -> bool {
    DEFAULT_CONTROL_SHIMS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            interpreter: InterpreterConfig::default(),
            script_path: None,
            invocation_style: InvocationStyle::default(),
            action_timeout_seconds: None,
            probe: ProbeConfig::default(),
            server: ServerConfig::default(),
            control_shims: DEFAULT_CONTROL_SHIMS,
        }
    }
}

impl Config {
    /// Resolved script path: the configured one, else the default name beside the executable
    pub fn resolved_script_path(&self) -> PathBuf {
        if let Some(path) = &self.script_path {
            return path.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_SCRIPT_NAME)))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRIPT_NAME))
    }

    pub fn action_timeout(&self) -> Option<Duration> {
        self.action_timeout_seconds.map(Duration::from_secs)
    }
}
