//! `bykilt validate`: configuration and catalog checks.

use std::path::Path;

use bykilt_catalog::ActionCatalog;
use bykilt_config::{Config, ConfigValidator};
use bykilt_git::resolve_git_script;
use bykilt_protocols::{ActionDefinition, ActionKind, DispatchError};

/// Check that `action` carries what its type needs to dispatch.
pub(crate) fn check_action(
    action: &ActionDefinition,
    config: &Config,
    catalog: &ActionCatalog,
) -> Result<(), DispatchError> {
    match action.kind()? {
        ActionKind::BrowserControl | ActionKind::UnlockFuture => {
            action.require_flow()?;
        }
        ActionKind::Script => {
            action.require("script", &action.script)?;
            action.require("command", &action.command)?;
        }
        ActionKind::ActionRunnerTemplate => {
            action.require("action_script", &action.action_script)?;
            action.require("command", &action.command)?;
        }
        ActionKind::GitScript => {
            resolve_git_script(action, &config.git_script, catalog)?;
        }
    }
    Ok(())
}

pub(crate) fn handle_validate(
    config: &Config,
    catalog_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut error_count = 0;

    let result = ConfigValidator::validate(config)?;
    for error in &result.errors {
        println!("error   [{}] {}", error.path, error.message);
    }
    for warning in &result.warnings {
        println!("warning [{}] {}", warning.path, warning.message);
    }
    error_count += result.errors.len();

    let catalog = ActionCatalog::load(catalog_path)?;
    for (index, action) in catalog.actions().iter().enumerate() {
        if let Err(e) = check_action(action, config, &catalog) {
            println!("error   [actions[{}] {}] {}", index, action.display_name(), e);
            error_count += 1;
        }
    }

    if error_count > 0 {
        return Err(format!("{} error(s) found", error_count).into());
    }
    println!(
        "OK: configuration valid, {} action(s) in {}",
        catalog.len(),
        catalog_path.display()
    );
    Ok(())
}
