//! Subprocess execution errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Empty command line")]
    EmptyCommand,

    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The child outlived its deadline and was killed. Output captured up to
    /// the kill is kept for diagnostics.
    #[error("Process timed out after {seconds} seconds")]
    Timeout {
        seconds: u64,
        stdout_lines: Vec<String>,
        stderr_lines: Vec<String>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
