//! # Bykilt Protocols
//!
//! Data model and interface definitions shared by every Bykilt crate.
//! Contains only types and traits - no process spawning or file IO.
//!
//! ## Core Types
//!
//! - [`ActionDefinition`] - One catalogued unit of automation work
//! - [`ActionKind`] - Closed set of execution strategies
//! - [`ParamsMap`] - Caller-supplied `${params.*}` substitution source
//! - [`ExecutionResult`] - Outcome of a dispatch call
//!
//! ## Core Traits
//!
//! - [`ProcessExecutor`] - Runs a command line and captures its output
//! - [`CommandReplayer`] - Replays a JSON command file on another backend

pub mod action;
pub mod error;
pub mod params;
pub mod process;
pub mod replay;
pub mod result;

pub use action::{ActionDefinition, ActionKind, FlowStep, ParamDeclaration};
pub use error::{DispatchError, ProcessError};
pub use params::ParamsMap;
pub use process::{ProcessExecutor, ProcessOutput, ProcessRequest};
pub use replay::{CommandReplayer, ReplayOutcome, ReplayRequest};
pub use result::{ExecutionResult, FailureKind};
