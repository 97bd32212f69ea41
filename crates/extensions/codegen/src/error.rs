//! Code generation errors.

use thiserror::Error;

use bykilt_protocols::DispatchError;

#[derive(Debug, Error)]
pub enum CodegenError {
    /// A flow step names an action the generator does not know.
    #[error("Unknown action '{action}' at step {index}")]
    UnknownAction { index: usize, action: String },

    #[error("Step {index} ({action}) is missing required field '{field}'")]
    MissingField {
        index: usize,
        action: String,
        field: String,
    },

    #[error("Step {index} has invalid '{field}': {message}")]
    InvalidField {
        index: usize,
        field: String,
        message: String,
    },

    #[error("Action not found: {0}")]
    ActionNotFound(String),

    #[error("Action '{0}' has no flow")]
    MissingFlow(String),

    #[error("Invalid command line '{command}': {message}")]
    InvalidCommand { command: String, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CodegenError> for DispatchError {
    fn from(err: CodegenError) -> Self {
        match err {
            CodegenError::ActionNotFound(name) => {
                DispatchError::Resolution(format!("action '{}' not found in catalog", name))
            }
            CodegenError::Io(e) => DispatchError::Io(e),
            other => DispatchError::Codegen(other.to_string()),
        }
    }
}
