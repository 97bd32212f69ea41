use super::*;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.paths.catalog, "llms.txt");
    assert_eq!(config.paths.scripts_dir, "myscript");
    assert_eq!(config.execution.timeout_seconds, 600);
    assert_eq!(config.execution.encodings[0], "utf-8");
    assert!(!config.execution.keep_workspaces);
    assert_eq!(config.browser.default, "chrome");
    assert!(config.recording.enabled);
    assert!(!config.git_script.use_new_method);
    assert_eq!(config.git_script.clone_depth, 1);
    assert_eq!(config.unlock_future.tab_strategy, "new_tab");
    assert!(config.archive.enabled);
    assert!(config.archive.cache_dirs.contains(&".pytest_cache".to_string()));
}

#[test]
fn test_timeout_zero_disables() {
    let mut execution = ExecutionConfig::default();
    assert_eq!(execution.timeout(), Some(Duration::from_secs(600)));
    execution.timeout_seconds = 0;
    assert_eq!(execution.timeout(), None);
}

#[test]
fn test_paths_resolve_relative() {
    let paths = PathsConfig::default();
    let base = Path::new("/srv/bykilt");
    assert_eq!(paths.catalog_path(base), PathBuf::from("/srv/bykilt/llms.txt"));
    assert_eq!(paths.scripts_dir(base), PathBuf::from("/srv/bykilt/myscript"));
    assert_eq!(paths.artifacts_dir(base), PathBuf::from("/srv/bykilt/artifacts"));
}

#[test]
fn test_paths_keep_absolute() {
    let paths = PathsConfig {
        artifacts_dir: "/var/artifacts".to_string(),
        ..Default::default()
    };
    assert_eq!(
        paths.artifacts_dir(Path::new("/srv")),
        PathBuf::from("/var/artifacts")
    );
}

#[test]
fn test_deserialize_profiles_and_scripts() {
    let content = r#"
        [browser]
        default = "edge"

        [browser.profiles.edge]
        executable_path = "/opt/edge/msedge"
        debug_port = 9333

        [git_script.scripts.site-search]
        git = "https://github.com/example/automation.git"
        script_path = "search/run.py"
        version = "v1.2"
    "#;
    let config: Config = toml::from_str(content).unwrap();
    assert_eq!(config.browser.default, "edge");
    let edge = &config.browser.profiles["edge"];
    assert_eq!(edge.debug_port, Some(9333));
    let entry = &config.git_script.scripts["site-search"];
    assert_eq!(entry.script_path, "search/run.py");
    assert_eq!(entry.version.as_deref(), Some("v1.2"));
}

#[test]
fn test_serialize_round_trip_keeps_defaults() {
    let config = Config::default();
    let text = toml::to_string(&config).unwrap();
    let parsed: Config = toml::from_str(&text).unwrap();
    assert_eq!(parsed.paths.scripts_dir, config.paths.scripts_dir);
    assert_eq!(parsed.archive.patterns, config.archive.patterns);
}
