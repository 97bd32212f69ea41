use super::*;
use std::collections::HashMap;

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_parse_aliases() {
    assert_eq!("Chrome".parse::<BrowserType>().unwrap(), BrowserType::Chrome);
    assert_eq!("msedge".parse::<BrowserType>().unwrap(), BrowserType::Edge);
    assert_eq!(" firefox ".parse::<BrowserType>().unwrap(), BrowserType::Firefox);
    assert!("netscape".parse::<BrowserType>().is_err());
}

#[test]
fn test_engine_mapping() {
    assert_eq!(BrowserType::Edge.engine(), "chromium");
    assert_eq!(BrowserType::Webkit.engine(), "webkit");
}

#[test]
fn test_resolve_defaults() {
    let settings = BrowserSettings::resolve(None, &BrowserConfig::default(), &env(&[])).unwrap();
    assert_eq!(settings.browser_type, BrowserType::Chrome);
    assert_eq!(settings.debug_port, 9222);
    assert!(settings.executable_path.is_none());
    assert!(settings.extra_args.is_empty());
}

#[test]
fn test_requested_beats_default_browser_env() {
    let vars = env(&[("DEFAULT_BROWSER", "edge")]);
    let settings = BrowserSettings::resolve(Some("firefox"), &BrowserConfig::default(), &vars).unwrap();
    assert_eq!(settings.browser_type, BrowserType::Firefox);

    let settings = BrowserSettings::resolve(Some("  "), &BrowserConfig::default(), &vars).unwrap();
    assert_eq!(settings.browser_type, BrowserType::Edge);
}

#[test]
fn test_env_beats_profile() {
    let mut config = BrowserConfig::default();
    config.profiles.insert(
        "chrome".to_string(),
        BrowserProfileConfig {
            executable_path: Some("/opt/chrome/chrome".to_string()),
            user_data_dir: Some("/profiles/chrome".to_string()),
            debug_port: Some(9300),
            extra_args: vec!["--lang=ja".to_string()],
        },
    );

    let from_profile = BrowserSettings::resolve(None, &config, &env(&[])).unwrap();
    assert_eq!(from_profile.executable_path, Some(PathBuf::from("/opt/chrome/chrome")));
    assert_eq!(from_profile.debug_port, 9300);
    assert_eq!(from_profile.extra_args, vec!["--lang=ja"]);

    let vars = env(&[
        ("CHROME_PATH", "/usr/bin/google-chrome"),
        ("CHROME_DEBUGGING_PORT", "9400"),
        ("BROWSER_EXTRA_ARGS", "--a| --b ||"),
    ]);
    let from_env = BrowserSettings::resolve(None, &config, &vars).unwrap();
    assert_eq!(from_env.executable_path, Some(PathBuf::from("/usr/bin/google-chrome")));
    assert_eq!(from_env.user_data_dir, Some(PathBuf::from("/profiles/chrome")));
    assert_eq!(from_env.debug_port, 9400);
    assert_eq!(from_env.extra_args, vec!["--a", "--b"]);
}

#[test]
fn test_invalid_port_env() {
    let vars = env(&[("EDGE_DEBUGGING_PORT", "not-a-port")]);
    let err = BrowserSettings::resolve(Some("edge"), &BrowserConfig::default(), &vars).unwrap_err();
    assert!(err.to_string().contains("EDGE_DEBUGGING_PORT"));
}

#[test]
fn test_to_env() {
    let settings = BrowserSettings {
        browser_type: BrowserType::Edge,
        executable_path: Some(PathBuf::from("/opt/edge")),
        user_data_dir: None,
        debug_port: 9223,
        extra_args: vec!["--x".to_string(), "--y".to_string()],
    };
    let vars = settings.to_env();
    assert_eq!(vars["BYKILT_BROWSER_TYPE"], "edge");
    assert_eq!(vars["BYKILT_BROWSER_ENGINE"], "chromium");
    assert_eq!(vars["BROWSER_EXECUTABLE_PATH"], "/opt/edge");
    assert_eq!(vars["BROWSER_EXTRA_ARGS"], "--x|--y");
    assert_eq!(vars["BROWSER_DEBUG_PORT"], "9223");
    assert!(!vars.contains_key("BROWSER_USER_DATA"));
}
