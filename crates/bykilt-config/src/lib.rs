//! # Bykilt Config
//!
//! Configuration management for Bykilt: the TOML schema and loader, plus the
//! environment-driven resolvers for browser settings and recording paths.

mod browser;
mod env;
mod error;
mod loader;
mod recording;
mod schema;
mod validator;

pub use browser::{BrowserSettings, BrowserType};
pub use env::{is_truthy, EnvLookup, ProcessEnv};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use recording::{resolve_recording_dir, run_scoped_recording_dir, RECORDING_PATH_ENV};
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
