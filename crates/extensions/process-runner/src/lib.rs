//! Subprocess runner for Bykilt.
//!
//! [`ProcessRunner`] implements [`ProcessExecutor`](bykilt_protocols::ProcessExecutor)
//! on top of `tokio::process`:
//!
//! - stdout and stderr are drained concurrently, line by line, and logged as
//!   they arrive under the `bykilt::process` target
//! - each line is decoded through an [`OutputDecoder`] fallback chain
//! - `python`/`python3` commands run under the resolved [`PythonInterpreter`]
//! - a request timeout kills the whole process group

mod decode;
mod interpreter;
mod runner;

pub use decode::OutputDecoder;
pub use interpreter::{normalize_argv, PythonInterpreter, PYTHON_ENV};
pub use runner::ProcessRunner;
