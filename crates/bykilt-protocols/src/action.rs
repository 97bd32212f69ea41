//! Action definitions as loaded from the catalog.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DispatchError;

/// Execution strategy selected by an action's `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Script looked up in the local scripts directory.
    Script,
    /// Flow compiled into a generated pytest/Playwright script.
    BrowserControl,
    /// Script living in a git repository.
    GitScript,
    /// Command template with defaulted parameters.
    ActionRunnerTemplate,
    /// Flow translated into JSON commands for the replay backend.
    UnlockFuture,
}

impl ActionKind {
    /// All known kinds, in catalog documentation order.
    pub const ALL: [ActionKind; 5] = [
        ActionKind::Script,
        ActionKind::BrowserControl,
        ActionKind::GitScript,
        ActionKind::ActionRunnerTemplate,
        ActionKind::UnlockFuture,
    ];

    /// The `type` string used in the catalog.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Script => "script",
            ActionKind::BrowserControl => "browser-control",
            ActionKind::GitScript => "git-script",
            ActionKind::ActionRunnerTemplate => "action_runner_template",
            ActionKind::UnlockFuture => "unlock-future",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| DispatchError::UnsupportedType(s.to_string()))
    }
}

/// One step of a browser-control flow.
///
/// The `action` discriminator selects the behavior; every other key is kept
/// verbatim and interpreted by the generator for that action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowStep {
    pub action: String,

    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl FlowStep {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            fields: serde_json::Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// String value of a field, if present and a string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.as_str())
    }
}

/// Declared parameter of an action (informational; the catalog does not enforce it).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamDeclaration {
    pub name: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// A named, typed unit of automation work.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionDefinition {
    /// Raw `type` string; validated into [`ActionKind`] at dispatch time.
    #[serde(rename = "type", default)]
    pub action_type: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamDeclaration>,

    /// Browser-control and unlock-future steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<Vec<FlowStep>>,

    /// Git repository URL (git-script).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<String>,

    /// Script path relative to the repository root (git-script).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_path: Option<String>,

    /// Branch, tag or commit to check out (git-script).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Command line template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Script file name inside the local scripts directory (script).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,

    /// Runner script reference (action_runner_template).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_script: Option<String>,

    /// Value of the `${template}` slot; falls back to `action_script`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Playwright slow-motion delay in milliseconds (browser-control).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slowmo: Option<u64>,

    #[serde(default, flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ActionDefinition {
    pub fn new(action_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Parse the declared `type`.
    pub fn kind(&self) -> Result<ActionKind, DispatchError> {
        self.action_type.parse()
    }

    /// Return a required string field or a `MissingField` error.
    pub fn require<'a>(
        &self,
        field: &'static str,
        value: &'a Option<String>,
    ) -> Result<&'a str, DispatchError> {
        match value.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(DispatchError::MissingField {
                kind: self.action_type.clone(),
                field: field.to_string(),
            }),
        }
    }

    /// The flow steps, or a `MissingField` error when absent or empty.
    pub fn require_flow(&self) -> Result<&[FlowStep], DispatchError> {
        match self.flow.as_deref() {
            Some(flow) if !flow.is_empty() => Ok(flow),
            _ => Err(DispatchError::MissingField {
                kind: self.action_type.clone(),
                field: "flow".to_string(),
            }),
        }
    }

    /// Ref to check out: `version`, else a `branch` key carried in `extra`.
    pub fn checkout_ref(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or_else(|| self.extra.get("branch").and_then(|v| v.as_str()))
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Name used in logs and artifact folders.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "unnamed"
        } else {
            self.name.trim()
        }
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
