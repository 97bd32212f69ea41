//! # Bykilt Core
//!
//! The dispatch engine: takes a catalogued action plus caller parameters,
//! prepares an executable artifact for the action's type and runs it.
//!
//! ## Components
//!
//! - [`Dispatcher`] - Routes an action to its execution strategy
//! - [`RunWorkspace`] - Per-call directory for generated files
//! - [`ScriptEnvironment`] - Variables exported to every script
//! - [`ArtifactArchiver`] / [`FsArchiver`] - Copies run artifacts after success
//! - [`ExternalReplayer`] - Default JSON command replay backend

pub mod archive;
pub mod dispatch;
pub mod env;
pub mod replay;
pub mod workspace;

pub use archive::{ArchiveError, ArchiveRequest, ArtifactArchiver, FsArchiver};
pub use dispatch::{DispatchRequest, Dispatcher};
pub use env::ScriptEnvironment;
pub use replay::ExternalReplayer;
pub use workspace::RunWorkspace;
