//! Checkout preparation for git-script actions.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, warn};

use bykilt_config::{is_truthy, EnvLookup, GitScriptConfig};
use bykilt_protocols::ProcessExecutor;

use crate::cache::RepoCache;
use crate::error::GitError;
use crate::patch::{patch_script_file, PatchOutcome};
use crate::repo::GitCommands;
use crate::resolve::GitScriptSpec;

/// Truthy value switches git-script actions to the cached, unpatched method.
pub const NEW_METHOD_ENV: &str = "BYKILT_GIT_SCRIPT_NEW_METHOD";

/// A checked-out repository ready to run.
///
/// Scratch clones are deleted and cache locks released when this is dropped.
#[derive(Debug)]
pub struct GitCheckout {
    pub repo_dir: PathBuf,
    pub script: PathBuf,
    /// Set for legacy checkouts.
    pub patch: Option<PatchOutcome>,
    _scratch: Option<TempDir>,
    _lock: Option<OwnedMutexGuard<()>>,
}

/// Prepares git-script checkouts.
pub struct GitWorkspace {
    git: GitCommands,
    cache: RepoCache,
}

impl GitWorkspace {
    pub fn new(
        executor: Arc<dyn ProcessExecutor>,
        cache_root: impl Into<PathBuf>,
        clone_depth: u32,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            git: GitCommands::new(executor, clone_depth, timeout),
            cache: RepoCache::new(cache_root),
        }
    }

    pub fn cache(&self) -> &RepoCache {
        &self.cache
    }

    /// `BYKILT_GIT_SCRIPT_NEW_METHOD` when set, else `git_script.use_new_method`.
    pub fn use_new_method(config: &GitScriptConfig, env: &dyn EnvLookup) -> bool {
        env.var(NEW_METHOD_ENV)
            .map(|v| is_truthy(&v))
            .unwrap_or(config.use_new_method)
    }

    /// Legacy method: clone into a scratch directory and patch the script's
    /// chromium launch calls.
    pub async fn prepare_scratch(&self, spec: &GitScriptSpec) -> Result<GitCheckout, GitError> {
        let scratch = tempfile::Builder::new().prefix("bykilt-git-").tempdir()?;
        let repo_dir = scratch.path().join("repo");

        self.git
            .clone_repo(&spec.git, &repo_dir, spec.version.as_deref())
            .await?;
        let script = locate_script(&repo_dir, &spec.script_path)?;
        let patch = patch_script_file(&script)?;

        Ok(GitCheckout {
            repo_dir,
            script,
            patch: Some(patch),
            _scratch: Some(scratch),
            _lock: None,
        })
    }

    /// New method: clone once into the cache, then fetch and check out on
    /// later runs. The script is not modified. The returned checkout holds the
    /// repository's lock.
    pub async fn prepare_cached(&self, spec: &GitScriptSpec) -> Result<GitCheckout, GitError> {
        let repo_dir = self.cache.repo_dir(&spec.git);
        let lock = self.cache.lock(&repo_dir).await;

        let reference = spec.version.as_deref();
        if repo_dir.join(".git").is_dir() {
            if let Err(e) = self.git.update(&repo_dir, reference).await {
                warn!(
                    "Updating cached clone {} failed ({}), cloning again",
                    repo_dir.display(),
                    e
                );
                tokio::fs::remove_dir_all(&repo_dir).await?;
                self.git.clone_repo(&spec.git, &repo_dir, reference).await?;
            }
        } else {
            if repo_dir.exists() {
                debug!("Removing incomplete clone at {}", repo_dir.display());
                tokio::fs::remove_dir_all(&repo_dir).await?;
            }
            tokio::fs::create_dir_all(self.cache.root()).await?;
            self.git.clone_repo(&spec.git, &repo_dir, reference).await?;
        }

        let script = locate_script(&repo_dir, &spec.script_path)?;
        Ok(GitCheckout {
            repo_dir,
            script,
            patch: None,
            _scratch: None,
            _lock: Some(lock),
        })
    }
}

fn locate_script(repo_dir: &Path, script_path: &str) -> Result<PathBuf, GitError> {
    let script = repo_dir.join(script_path);
    if script.is_file() {
        Ok(script)
    } else {
        Err(GitError::ScriptNotFound(script))
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
