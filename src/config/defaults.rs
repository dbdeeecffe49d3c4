//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

/// Interpreter used to run the automation script
#[cfg(windows)]
pub const DEFAULT_INTERPRETER: &str = "powershell.exe";
#[cfg(not(windows))]
pub const DEFAULT_INTERPRETER: &str = "pwsh";

/// Flags passed before every command: no profile, bypassed execution policy, no prompts
pub const DEFAULT_INTERPRETER_FLAGS: &[&str] = &[
    "-NoProfile",
    "-ExecutionPolicy",
    "Bypass",
    "-NonInteractive",
];

/// Flag that introduces an inline command string
pub const DEFAULT_COMMAND_FLAG: &str = "-Command";

/// Flag that introduces a script file path
pub const DEFAULT_FILE_FLAG: &str = "-File";

/// Automation script looked up next to the executable when no path is configured
pub const DEFAULT_SCRIPT_NAME: &str = "TitaniumQuickStart_5.0.ps1";

/// Reachability probe target and bound
pub const DEFAULT_PROBE_URL: &str = "https://ca.tierpoint.com";
pub const DEFAULT_PROBE_TIMEOUT_SECONDS: u64 = 5;

/// Local server binding; port 0 picks a free port at startup
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 0;
pub const DEFAULT_OPEN_BROWSER: bool = true;

/// Emit placeholder control objects in the prelude
pub const DEFAULT_CONTROL_SHIMS: bool = true;

/// Config file location (tilde-expanded)
pub const DEFAULT_CONFIG_PATH: &str = "~/.quickstart/config.json";

/// Environment overrides
pub const ENV_SCRIPT: &str = "QUICKSTART_SCRIPT";
pub const ENV_INTERPRETER: &str = "QUICKSTART_INTERPRETER";
pub const ENV_PORT: &str = "QUICKSTART_PORT";
