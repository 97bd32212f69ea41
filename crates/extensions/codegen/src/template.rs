//! Placeholder substitution.
//!
//! Three placeholder forms exist:
//!
//! | Form | Replaced by |
//! |------|-------------|
//! | `${params.NAME}` | `params[NAME]`; left verbatim when absent |
//! | `${params.NAME\|DEFAULT}` | `params[NAME]` when non-empty, else `DEFAULT` |
//! | `${slot}` | the named slot (`script_path`, `action_script`, ...); left verbatim when unknown |
//!
//! Every function makes exactly one `replace_all` pass, so substituted values
//! are never re-expanded.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

use bykilt_protocols::ParamsMap;

use crate::error::CodegenError;

static SIMPLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{params\.([A-Za-z_][A-Za-z0-9_\-]*)\}").expect("valid params pattern")
});

static DEFAULTED_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{params\.([A-Za-z_][A-Za-z0-9_\-]*)(?:\|([^}]*))?\}")
        .expect("valid defaulted params pattern")
});

static SLOT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([a-z_][a-z0-9_]*)\}").expect("valid slot pattern"));

/// Defaulted params and slots in one alternation.
static COMMAND_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{(?:params\.([A-Za-z_][A-Za-z0-9_\-]*)(?:\|([^}]*))?|([a-z_][a-z0-9_]*))\}")
        .expect("valid command pattern")
});

/// Named values for `${slot}` placeholders.
pub type Slots = BTreeMap<String, String>;

/// `${params.NAME}` only.
pub fn substitute_params(text: &str, params: &ParamsMap) -> String {
    SIMPLE_PATTERN
        .replace_all(text, |caps: &Captures<'_>| match params.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// `${params.NAME}` and `${params.NAME|DEFAULT}`.
pub fn substitute_defaulted(text: &str, params: &ParamsMap) -> String {
    DEFAULTED_PATTERN
        .replace_all(text, |caps: &Captures<'_>| resolve_param(caps, params, 1, 2))
        .into_owned()
}

/// `${slot}` only.
pub fn substitute_slots(text: &str, slots: &Slots) -> String {
    SLOT_PATTERN
        .replace_all(text, |caps: &Captures<'_>| match slots.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Render a command template: defaulted params and slots in a single pass.
pub fn render_command(template: &str, params: &ParamsMap, slots: &Slots) -> String {
    COMMAND_PATTERN
        .replace_all(template, |caps: &Captures<'_>| {
            if caps.get(1).is_some() {
                return resolve_param(caps, params, 1, 2);
            }
            match slots.get(&caps[3]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn resolve_param(caps: &Captures<'_>, params: &ParamsMap, name: usize, default_group: usize) -> String {
    match caps.get(default_group) {
        Some(default) => params
            .get_non_empty(&caps[name])
            .map(str::to_string)
            .unwrap_or_else(|| default.as_str().to_string()),
        None => match params.get(&caps[name]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        },
    }
}

/// Apply [`substitute_params`] to every string inside `value`.
pub fn substitute_value(value: &Value, params: &ParamsMap) -> Value {
    match value {
        Value::String(s) => Value::String(substitute_params(s, params)),
        Value::Array(items) => Value::Array(items.iter().map(|v| substitute_value(v, params)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), substitute_value(v, params)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Split a rendered command line into argv with POSIX shell quoting rules.
pub fn split_command(command: &str) -> Result<Vec<String>, CodegenError> {
    let argv = shell_words::split(command).map_err(|e| CodegenError::InvalidCommand {
        command: command.to_string(),
        message: e.to_string(),
    })?;
    if argv.is_empty() {
        return Err(CodegenError::InvalidCommand {
            command: command.to_string(),
            message: "empty command".to_string(),
        });
    }
    Ok(argv)
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
