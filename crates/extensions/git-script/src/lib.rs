//! Git-hosted scripts for Bykilt.
//!
//! - [`resolve_git_script`] finds the repository, script and ref for an action
//! - [`GitWorkspace`] clones into a scratch directory (legacy) or a persistent
//!   per-repository cache (new method)
//! - [`patch_launch_boilerplate`] rewrites chromium launch calls in legacy clones

mod cache;
mod error;
mod patch;
mod repo;
mod resolve;
mod workspace;

pub use cache::{repo_slug, RepoCache};
pub use error::GitError;
pub use patch::{patch_launch_boilerplate, patch_script_file, PatchOutcome, PATCHED_ENGINE};
pub use repo::GitCommands;
pub use resolve::{resolve_git_script, GitScriptSpec, DEFAULT_GIT_COMMAND};
pub use workspace::{GitCheckout, GitWorkspace, NEW_METHOD_ENV};
