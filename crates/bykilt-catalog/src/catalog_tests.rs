use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

const CATALOG: &str = r#"
actions:
  - name: login
    type: browser-control
    description: first
    flow:
      - action: navigate
        url: https://example.com/login
  - name: report
    type: script
    script: report.py
    command: "python ${script_path}"
  - name: login
    type: unlock-future
    description: second
"#;

#[test]
fn test_get_first_wins() {
    let catalog: ActionCatalog = CATALOG.parse().unwrap();
    assert_eq!(catalog.len(), 3);
    let login = catalog.get("login").unwrap();
    assert_eq!(login.description.as_deref(), Some("first"));
    assert_eq!(login.action_type, "browser-control");
}

#[test]
fn test_get_missing() {
    let catalog: ActionCatalog = CATALOG.parse().unwrap();
    assert!(catalog.get("nope").is_none());
}

#[test]
fn test_names_in_file_order() {
    let catalog: ActionCatalog = CATALOG.parse().unwrap();
    assert_eq!(catalog.names(), vec!["login", "report", "login"]);
}

#[test]
fn test_find_by_predicate() {
    let catalog: ActionCatalog = CATALOG.parse().unwrap();
    let found = catalog
        .find(|a| a.name == "login" && a.action_type == "unlock-future")
        .unwrap();
    assert_eq!(found.description.as_deref(), Some("second"));
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(CATALOG.as_bytes()).unwrap();

    let catalog = ActionCatalog::load(file.path()).unwrap();
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.source(), Some(file.path()));
}

#[test]
fn test_load_missing_file() {
    let result = ActionCatalog::load(Path::new("/nonexistent/llms.txt"));
    assert!(matches!(result, Err(CatalogError::NotFound(_))));
}

#[test]
fn test_default_is_empty() {
    let catalog = ActionCatalog::default();
    assert!(catalog.is_empty());
    assert!(catalog.source().is_none());
}

#[test]
fn test_new_from_definitions() {
    let catalog = ActionCatalog::new(vec![ActionDefinition::new("script", "a")]);
    assert_eq!(catalog.get("a").unwrap().action_type, "script");
}
