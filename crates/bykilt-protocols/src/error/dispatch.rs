//! Dispatch errors.

use std::path::PathBuf;

use thiserror::Error;

use super::process::ProcessError;
use crate::result::FailureKind;

#[derive(Debug, Error)]
pub enum DispatchError {
    /// The action lacks a field its type requires.
    #[error("Missing required field '{field}' for {kind} action")]
    MissingField { kind: String, field: String },

    #[error("Invalid action definition: {0}")]
    InvalidDefinition(String),

    /// Runtime settings (browser, recording directory) could not be resolved.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A referenced script, repository or catalog entry does not exist.
    #[error("Resolution failed: {0}")]
    Resolution(String),

    #[error("Unsupported action type: {0}")]
    UnsupportedType(String),

    #[error("Browser launch boilerplate not found in {}", .0.display())]
    PatchTargetNotFound(PathBuf),

    #[error("Script generation failed: {0}")]
    Codegen(String),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("Command replay failed: {0}")]
    Replay(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DispatchError {
    /// Classification used when the error becomes an [`ExecutionResult`](crate::ExecutionResult).
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            DispatchError::MissingField { .. }
            | DispatchError::InvalidDefinition(_)
            | DispatchError::Configuration(_)
            | DispatchError::Codegen(_) => FailureKind::Configuration,
            DispatchError::Resolution(_) => FailureKind::Resolution,
            DispatchError::UnsupportedType(_) => FailureKind::UnsupportedType,
            DispatchError::PatchTargetNotFound(_) => FailureKind::PatchTargetNotFound,
            DispatchError::Process(ProcessError::Timeout { .. }) => FailureKind::Timeout,
            DispatchError::Process(_) | DispatchError::Replay(_) | DispatchError::Io(_) => {
                FailureKind::Internal
            }
        }
    }
}
