//! Git script errors.

use std::path::PathBuf;

use thiserror::Error;

use bykilt_protocols::{DispatchError, ProcessError};

#[derive(Debug, Error)]
pub enum GitError {
    #[error("Missing required field '{0}' for git-script action")]
    MissingField(String),

    #[error("Invalid script path '{0}': must be relative and stay inside the repository")]
    InvalidScriptPath(String),

    #[error("git {operation} failed (exit code {exit_code}): {detail}")]
    Command {
        operation: String,
        exit_code: i32,
        detail: String,
    },

    #[error("Script not found in repository: {}", .0.display())]
    ScriptNotFound(PathBuf),

    #[error("Browser launch boilerplate not found in {}", .0.display())]
    PatchTargetNotFound(PathBuf),

    #[error(
        "Legacy git scripts launch {expected}, but browser '{browser}' runs on {engine}; \
         use a {expected}-based browser or enable the cached clone method"
    )]
    UnsupportedEngine {
        browser: String,
        engine: String,
        expected: String,
    },

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<GitError> for DispatchError {
    fn from(err: GitError) -> Self {
        match err {
            GitError::MissingField(field) => DispatchError::MissingField {
                kind: "git-script".to_string(),
                field,
            },
            GitError::InvalidScriptPath(_) => DispatchError::InvalidDefinition(err.to_string()),
            GitError::UnsupportedEngine { .. } => DispatchError::Configuration(err.to_string()),
            GitError::Command { .. } | GitError::ScriptNotFound(_) => {
                DispatchError::Resolution(err.to_string())
            }
            GitError::PatchTargetNotFound(path) => DispatchError::PatchTargetNotFound(path),
            GitError::Process(e) => DispatchError::Process(e),
            GitError::Io(e) => DispatchError::Io(e),
        }
    }
}
