//! Dispatch outcome types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Why a dispatch did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    /// The action definition is missing something its type needs.
    Configuration,
    /// A script, repository or catalog entry could not be found.
    Resolution,
    /// The script ran and exited non-zero.
    Execution { exit_code: i32 },
    /// The script exceeded its deadline and was killed.
    Timeout,
    UnsupportedType,
    PatchTargetNotFound,
    Internal,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Configuration => f.write_str("configuration error"),
            FailureKind::Resolution => f.write_str("resolution error"),
            FailureKind::Execution { exit_code } => write!(f, "execution error (exit code {})", exit_code),
            FailureKind::Timeout => f.write_str("timeout"),
            FailureKind::UnsupportedType => f.write_str("unsupported action type"),
            FailureKind::PatchTargetNotFound => f.write_str("patch target not found"),
            FailureKind::Internal => f.write_str("internal error"),
        }
    }
}

/// Result of one dispatch call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionResult {
    Success {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<PathBuf>,
    },
    Failure {
        #[serde(flatten)]
        kind: FailureKind,
        detail: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<PathBuf>,
    },
}

impl ExecutionResult {
    pub fn success(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Success {
            message: message.into(),
            path,
        }
    }

    pub fn failure(kind: FailureKind, detail: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Failure {
            kind,
            detail: detail.into(),
            path,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Success { path, .. } | Self::Failure { path, .. } => path.as_deref(),
        }
    }

    /// Human-readable message. Failure messages are prefixed with their kind.
    pub fn message(&self) -> String {
        match self {
            Self::Success { message, .. } => message.clone(),
            Self::Failure { kind, detail, .. } => format!("Error ({}): {}", kind, detail),
        }
    }

    /// The inherited `(message, path)` pair.
    pub fn into_legacy(self) -> (String, Option<String>) {
        let message = self.message();
        let path = match self {
            Self::Success { path, .. } | Self::Failure { path, .. } => {
                path.map(|p| p.to_string_lossy().into_owned())
            }
        };
        (message, path)
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
