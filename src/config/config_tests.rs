use super::*;
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.interpreter.program, DEFAULT_INTERPRETER);
    assert_eq!(config.interpreter.command_flag, "-Command");
    assert_eq!(config.interpreter.file_flag.as_deref(), Some("-File"));
    assert_eq!(config.invocation_style, InvocationStyle::ScriptFile);
    assert_eq!(config.action_timeout_seconds, None);
    assert_eq!(config.probe.url, DEFAULT_PROBE_URL);
    assert_eq!(config.probe.timeout_seconds, DEFAULT_PROBE_TIMEOUT_SECONDS);
    assert_eq!(config.server.host, DEFAULT_HOST);
    assert_eq!(config.server.port, DEFAULT_PORT);
    assert!(config.control_shims);
}

#[test]
fn test_default_flags_disable_profile_and_bypass_policy() {
    let flags = InterpreterConfig::default().flags;
    assert!(flags.contains(&"-NoProfile".to_string()));
    let idx = flags
        .iter()
        .position(|f| f == "-ExecutionPolicy")
        .expect("execution policy flag");
    assert_eq!(flags[idx + 1], "Bypass");
}

#[test]
fn test_partial_json_fills_defaults() {
    let json = r#"{"scriptPath": "C:/tools/qs.ps1", "probe": {"timeoutSeconds": 9}}"#;
    let config: Config = serde_json::from_str(json).unwrap();
    assert_eq!(config.script_path, Some(PathBuf::from("C:/tools/qs.ps1")));
    assert_eq!(config.probe.timeout_seconds, 9);
    assert_eq!(config.probe.url, DEFAULT_PROBE_URL);
    assert_eq!(config.interpreter, InterpreterConfig::default());
}

#[test]
fn test_invocation_style_camel_case() {
    let config: Config = serde_json::from_str(r#"{"invocationStyle": "dotSource"}"#).unwrap();
    assert_eq!(config.invocation_style, InvocationStyle::DotSource);
}

#[test]
fn test_config_serialization_round_trip() {
    let mut config = Config::default();
    config.action_timeout_seconds = Some(30);
    config.server.open_browser = false;

    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"actionTimeoutSeconds\":30"));
    let deserialized: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized, config);
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config_from(&dir.path().join("nope.json"));
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_invalid_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert_eq!(load_config_from(&path), Config::default());
}

#[test]
fn test_load_valid_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"interpreter": {{"program": "powershell.exe"}}, "server": {{"port": 8099, "openBrowser": false}}}}"#
    )
    .unwrap();

    let config = load_config_from(file.path());
    assert_eq!(config.interpreter.program, "powershell.exe");
    assert_eq!(config.server.port, 8099);
    assert!(!config.server.open_browser);
    assert_eq!(config.server.host, DEFAULT_HOST);
}

#[test]
fn test_env_overrides() {
    let env: HashMap<&str, &str> = [
        ("QUICKSTART_SCRIPT", "/opt/qs/run.ps1"),
        ("QUICKSTART_INTERPRETER", " powershell.exe "),
        ("QUICKSTART_PORT", "8123"),
    ]
    .into_iter()
    .collect();

    let mut config = Config::default();
    apply_env_overrides(&mut config, |k| env.get(k).map(|v| v.to_string()));

    assert_eq!(config.script_path, Some(PathBuf::from("/opt/qs/run.ps1")));
    assert_eq!(config.interpreter.program, "powershell.exe");
    assert_eq!(config.server.port, 8123);
}

#[test]
fn test_env_override_invalid_port_ignored() {
    let mut config = Config::default();
    apply_env_overrides(&mut config, |k| {
        (k == "QUICKSTART_PORT").then(|| "not-a-port".to_string())
    });
    assert_eq!(config.server.port, DEFAULT_PORT);
}

#[test]
fn test_resolved_script_path_prefers_configured() {
    let mut config = Config::default();
    config.script_path = Some(PathBuf::from("/x/y.ps1"));
    assert_eq!(config.resolved_script_path(), PathBuf::from("/x/y.ps1"));

    config.script_path = None;
    assert!(config.resolved_script_path().ends_with(DEFAULT_SCRIPT_NAME));
}
