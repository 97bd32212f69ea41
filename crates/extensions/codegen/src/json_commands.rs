//! Flow to JSON command translation for the unlock-future replay backend.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use bykilt_catalog::ActionCatalog;
use bykilt_protocols::{ActionDefinition, FlowStep, ParamsMap};

use crate::error::CodegenError;
use crate::template::substitute_value;

/// One replayable command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonCommand {
    pub action: String,
    pub args: Vec<String>,
}

/// The file handed to the replay backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDocument {
    pub commands: Vec<JsonCommand>,
    pub action_type: String,
    pub keep_tab_open: bool,
    pub tab_selection_strategy: String,
    pub source_action: String,
}

/// Translates flows into [`CommandDocument`] files.
pub struct CommandTranslator;

impl CommandTranslator {
    /// Look up `action_name` in `catalog` and write its command file into
    /// `output_dir`.
    pub fn translate(
        action_name: &str,
        params: &ParamsMap,
        catalog: &ActionCatalog,
        maintain_session: bool,
        tab_strategy: &str,
        output_dir: &Path,
    ) -> Result<PathBuf, CodegenError> {
        let action = catalog
            .get(action_name)
            .ok_or_else(|| CodegenError::ActionNotFound(action_name.to_string()))?;
        Self::translate_action(action, params, maintain_session, tab_strategy, output_dir)
    }

    /// Write the command file for `action` into `output_dir`.
    ///
    /// The file name depends only on the action name and params, so repeating a
    /// translation overwrites the same file.
    pub fn translate_action(
        action: &ActionDefinition,
        params: &ParamsMap,
        maintain_session: bool,
        tab_strategy: &str,
        output_dir: &Path,
    ) -> Result<PathBuf, CodegenError> {
        let document = Self::build_document(action, params, maintain_session, tab_strategy)?;

        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(Self::file_name(&action.name, params));
        fs::write(&path, serde_json::to_string_pretty(&document)?)?;

        debug!(
            "Wrote {} commands for '{}' to {}",
            document.commands.len(),
            action.name,
            path.display()
        );
        Ok(path)
    }

    pub fn build_document(
        action: &ActionDefinition,
        params: &ParamsMap,
        maintain_session: bool,
        tab_strategy: &str,
    ) -> Result<CommandDocument, CodegenError> {
        let flow = action
            .flow
            .as_deref()
            .filter(|f| !f.is_empty())
            .ok_or_else(|| CodegenError::MissingFlow(action.name.clone()))?;

        let mut commands = Vec::with_capacity(flow.len());
        for (index, step) in flow.iter().enumerate() {
            match Self::translate_step(index, step, params)? {
                Some(command) => commands.push(command),
                None => warn!(
                    "Step {} of '{}' has action '{}' with no JSON command equivalent; skipped",
                    index, action.name, step.action
                ),
            }
        }

        Ok(CommandDocument {
            commands,
            action_type: "unlock-future".to_string(),
            keep_tab_open: maintain_session,
            tab_selection_strategy: tab_strategy.to_string(),
            source_action: action.name.clone(),
        })
    }

    /// `None` for steps that have no command equivalent.
    fn translate_step(
        index: usize,
        step: &FlowStep,
        params: &ParamsMap,
    ) -> Result<Option<JsonCommand>, CodegenError> {
        let field = |name: &str| -> Result<String, CodegenError> {
            step.fields
                .get(name)
                .map(|v| substitute_value(v, params))
                .and_then(|v| match v {
                    serde_json::Value::String(s) => Some(s),
                    serde_json::Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .ok_or_else(|| CodegenError::MissingField {
                    index,
                    action: step.action.clone(),
                    field: name.to_string(),
                })
        };

        let command = match step.action.trim() {
            "navigate" => JsonCommand {
                action: "command".to_string(),
                args: vec![field("url")?],
            },
            "click" => JsonCommand {
                action: "click".to_string(),
                args: vec![field("selector")?],
            },
            "fill" => JsonCommand {
                action: "fill_form".to_string(),
                args: vec![field("selector")?, field("value").or_else(|_| field("text"))?],
            },
            "keyboard_press" => JsonCommand {
                action: "keyboard_press".to_string(),
                args: vec![field("key")?],
            },
            _ => return Ok(None),
        };
        Ok(Some(command))
    }

    /// `<sanitized-name>_<12 hex chars of sha256(name + sorted params)>.json`
    pub fn file_name(action_name: &str, params: &ParamsMap) -> String {
        let mut hasher = Sha256::new();
        hasher.update(action_name.as_bytes());
        for (key, value) in params.iter() {
            hasher.update([0u8]);
            hasher.update(key.as_bytes());
            hasher.update([b'=']);
            hasher.update(value.as_bytes());
        }
        let digest = format!("{:x}", hasher.finalize());
        format!("{}_{}.json", sanitize_name(action_name), &digest[..12])
    }
}

/// Keep ASCII alphanumerics, `-` and `_`; replace everything else with `_`.
pub fn sanitize_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized.is_empty() {
        "action".to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
#[path = "json_commands_tests.rs"]
mod tests;
