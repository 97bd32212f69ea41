use super::*;
use bykilt_config::GitScriptEntry;

fn git_action(name: &str) -> ActionDefinition {
    ActionDefinition::new("git-script", name)
}

#[test]
fn test_direct_fields() {
    let mut action = git_action("direct");
    action.git = Some("https://example.com/r.git".to_string());
    action.script_path = Some("tests/run.py".to_string());
    action.version = Some("v1.2".to_string());

    let spec = resolve_git_script(&action, &GitScriptConfig::default(), &ActionCatalog::default()).unwrap();
    assert_eq!(spec.git, "https://example.com/r.git");
    assert_eq!(spec.script_path, "tests/run.py");
    assert_eq!(spec.version.as_deref(), Some("v1.2"));
    assert_eq!(spec.command, DEFAULT_GIT_COMMAND);
}

#[test]
fn test_nothing_resolvable() {
    let action = ActionDefinition::new("git-script", "");
    let err = resolve_git_script(&action, &GitScriptConfig::default(), &ActionCatalog::default())
        .unwrap_err();
    assert!(matches!(err, GitError::MissingField(ref f) if f == "git"));
}

#[test]
fn test_missing_script_path_named() {
    let mut action = ActionDefinition::new("git-script", "");
    action.git = Some("https://example.com/r.git".to_string());
    let err = resolve_git_script(&action, &GitScriptConfig::default(), &ActionCatalog::default())
        .unwrap_err();
    assert!(matches!(err, GitError::MissingField(ref f) if f == "script_path"));
}

#[test]
fn test_config_lookup_by_name() {
    let mut config = GitScriptConfig::default();
    config.scripts.insert(
        "site-check".to_string(),
        GitScriptEntry {
            git: "https://example.com/site.git".to_string(),
            script_path: "check.py".to_string(),
            version: Some("main".to_string()),
        },
    );
    let mut action = git_action("site-check");
    action.command = Some("python ${script_path} --fast".to_string());

    let spec = resolve_git_script(&action, &config, &ActionCatalog::default()).unwrap();
    assert_eq!(spec.git, "https://example.com/site.git");
    assert_eq!(spec.version.as_deref(), Some("main"));
    assert_eq!(spec.command, "python ${script_path} --fast");
}

#[test]
fn test_catalog_lookup_by_name() {
    let catalog: ActionCatalog = r#"
actions:
  - name: nightly
    type: git-script
    git: https://example.com/nightly.git
    script_path: jobs/nightly.py
    branch: release
    command: "python ${script_path} --nightly"
"#
    .parse()
    .unwrap();

    let spec = resolve_git_script(&git_action("nightly"), &GitScriptConfig::default(), &catalog).unwrap();
    assert_eq!(spec.git, "https://example.com/nightly.git");
    assert_eq!(spec.script_path, "jobs/nightly.py");
    assert_eq!(spec.version.as_deref(), Some("release"));
    assert_eq!(spec.command, "python ${script_path} --nightly");
}

#[test]
fn test_catalog_lookup_ignores_other_types() {
    let catalog: ActionCatalog = r#"
actions:
  - name: nightly
    type: script
    git: https://example.com/nightly.git
    script_path: jobs/nightly.py
"#
    .parse()
    .unwrap();
    assert!(resolve_git_script(&git_action("nightly"), &GitScriptConfig::default(), &catalog).is_err());
}

#[test]
fn test_script_path_must_stay_inside_repo() {
    let mut action = git_action("x");
    action.git = Some("https://example.com/r.git".to_string());
    action.script_path = Some("../outside.py".to_string());
    let err = resolve_git_script(&action, &GitScriptConfig::default(), &ActionCatalog::default())
        .unwrap_err();
    assert!(matches!(err, GitError::InvalidScriptPath(_)));

    action.script_path = Some("/etc/passwd".to_string());
    assert!(resolve_git_script(&action, &GitScriptConfig::default(), &ActionCatalog::default()).is_err());
}
