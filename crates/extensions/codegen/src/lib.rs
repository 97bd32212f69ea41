//! Code generation for Bykilt actions.
//!
//! - [`template`] - `${params.*}` and named-slot substitution, command splitting
//! - [`BrowserControlGenerator`] - compiles a flow into a pytest/Playwright module
//! - [`CommandTranslator`] - compiles a flow into a JSON command file

pub mod browser_control;
mod error;
pub mod json_commands;
mod python;
pub mod template;

pub use browser_control::{BrowserControlGenerator, BrowserStep, ExtractTarget, OutputMode, TEST_FUNCTION};
pub use error::CodegenError;
pub use json_commands::{sanitize_name, CommandDocument, CommandTranslator, JsonCommand};
