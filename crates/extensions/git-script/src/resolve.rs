//! Git script resolution.

use std::path::{Component, Path};

use tracing::debug;

use bykilt_catalog::ActionCatalog;
use bykilt_config::GitScriptConfig;
use bykilt_protocols::{ActionDefinition, ActionKind};

use crate::error::GitError;

/// Command used when neither the action nor its catalog source names one.
pub const DEFAULT_GIT_COMMAND: &str = "python ${script_path}";

/// Where a git-script action's script lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitScriptSpec {
    pub git: String,
    /// Relative to the repository root.
    pub script_path: String,
    /// Branch, tag or commit; `None` uses the remote default branch.
    pub version: Option<String>,
    /// Command template with `${script_path}` and `${params.*}` placeholders.
    pub command: String,
}

/// Resolve `action`'s repository, script and ref.
///
/// An action carrying both `git` and `script_path` is used as is. Otherwise its
/// `name` is looked up in `[git_script.scripts]`, then in the catalog for a
/// git-script action of the same name that carries both fields. Fields set on
/// `action` itself take precedence over the looked-up entry.
pub fn resolve_git_script(
    action: &ActionDefinition,
    config: &GitScriptConfig,
    catalog: &ActionCatalog,
) -> Result<GitScriptSpec, GitError> {
    let own_git = non_empty(action.git.as_deref());
    let own_script = non_empty(action.script_path.as_deref());
    let own_ref = action.checkout_ref().map(str::to_string);
    let own_command = non_empty(action.command.as_deref());

    let spec = match (own_git, own_script) {
        (Some(git), Some(script_path)) => GitScriptSpec {
            git: git.to_string(),
            script_path: script_path.to_string(),
            version: own_ref,
            command: own_command.unwrap_or(DEFAULT_GIT_COMMAND).to_string(),
        },
        _ => lookup_by_name(action, config, catalog).ok_or_else(|| {
            let field = if own_git.is_none() { "git" } else { "script_path" };
            GitError::MissingField(field.to_string())
        })?,
    };

    validate_script_path(&spec.script_path)?;
    debug!(
        "Resolved git script {} :: {} @ {}",
        spec.git,
        spec.script_path,
        spec.version.as_deref().unwrap_or("HEAD")
    );
    Ok(spec)
}

fn lookup_by_name(
    action: &ActionDefinition,
    config: &GitScriptConfig,
    catalog: &ActionCatalog,
) -> Option<GitScriptSpec> {
    let name = action.name.trim();
    if name.is_empty() {
        return None;
    }

    let own_ref = action.checkout_ref().map(str::to_string);
    let own_command = non_empty(action.command.as_deref()).map(str::to_string);

    if let Some(entry) = config.scripts.get(name) {
        if non_empty(Some(&entry.git)).is_some() && non_empty(Some(&entry.script_path)).is_some() {
            debug!("Git script '{}' resolved from config", name);
            return Some(GitScriptSpec {
                git: entry.git.clone(),
                script_path: entry.script_path.clone(),
                version: own_ref.or_else(|| entry.version.clone()),
                command: own_command.unwrap_or_else(|| DEFAULT_GIT_COMMAND.to_string()),
            });
        }
    }

    let source = catalog.find(|candidate| {
        candidate.name.trim() == name
            && candidate.kind().ok() == Some(ActionKind::GitScript)
            && non_empty(candidate.git.as_deref()).is_some()
            && non_empty(candidate.script_path.as_deref()).is_some()
    })?;
    debug!("Git script '{}' resolved from catalog", name);

    Some(GitScriptSpec {
        git: source.git.clone().unwrap_or_default(),
        script_path: source.script_path.clone().unwrap_or_default(),
        version: own_ref.or_else(|| source.checkout_ref().map(str::to_string)),
        command: own_command
            .or_else(|| non_empty(source.command.as_deref()).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_GIT_COMMAND.to_string()),
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn validate_script_path(script_path: &str) -> Result<(), GitError> {
    let path = Path::new(script_path);
    let escapes = path.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(GitError::InvalidScriptPath(script_path.to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
