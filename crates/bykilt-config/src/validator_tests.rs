use super::*;
use crate::schema::{BrowserProfileConfig, GitScriptEntry};

fn with_replay_command(mut config: Config) -> Config {
    config.unlock_future.replay_command = Some("python replay.py ${commands_file}".to_string());
    config
}

#[test]
fn test_validate_default_config() {
    let config = Config::default();
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    // replay command is unset by default
    assert!(result
        .warnings
        .iter()
        .any(|w| w.path == "unlock_future.replay_command"));
}

#[test]
fn test_validate_complete_config_has_no_warnings() {
    let config = with_replay_command(Config::default());
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_unknown_default_browser() {
    let mut config = Config::default();
    config.browser.default = "netscape".to_string();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "browser.default"));
}

#[test]
fn test_validate_profile_port_zero() {
    let mut config = Config::default();
    config.browser.profiles.insert(
        "edge".to_string(),
        BrowserProfileConfig {
            debug_port: Some(0),
            ..Default::default()
        },
    );

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result
        .errors
        .iter()
        .any(|e| e.path == "browser.profiles.edge.debug_port"));
}

#[test]
fn test_validate_unknown_profile_name() {
    let mut config = Config::default();
    config
        .browser
        .profiles
        .insert("lynx".to_string(), BrowserProfileConfig::default());

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
}

#[test]
fn test_validate_git_script_entry() {
    let mut config = Config::default();
    config.git_script.scripts.insert(
        "broken".to_string(),
        GitScriptEntry {
            git: "".to_string(),
            script_path: "run.py".to_string(),
            version: None,
        },
    );

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result
        .errors
        .iter()
        .any(|e| e.path == "git_script.scripts.broken.git"));
}

#[test]
fn test_validate_empty_encodings() {
    let mut config = Config::default();
    config.execution.encodings.clear();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "execution.encodings"));
}

#[test]
fn test_validate_timeout_disabled_warning() {
    let mut config = with_replay_command(Config::default());
    config.execution.timeout_seconds = 0;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result
        .warnings
        .iter()
        .any(|w| w.path == "execution.timeout_seconds"));
}

#[test]
fn test_validate_replay_command_without_placeholder() {
    let mut config = Config::default();
    config.unlock_future.replay_command = Some("python replay.py".to_string());

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(!result.warnings.is_empty());
}

#[test]
fn test_validate_empty_path() {
    let mut config = Config::default();
    config.paths.scripts_dir = " ".to_string();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "paths.scripts_dir"));
}

#[test]
fn test_validation_result_default() {
    let result = ValidationResult::default();
    assert!(result.is_valid());
    assert!(result.errors.is_empty());
    assert!(result.warnings.is_empty());
}
