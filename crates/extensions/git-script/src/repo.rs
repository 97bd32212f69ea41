//! Git command helpers run through a [`ProcessExecutor`].

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use bykilt_protocols::{ProcessExecutor, ProcessOutput, ProcessRequest};

use crate::error::GitError;

/// stderr lines kept in a failed git command's error.
const ERROR_TAIL_LINES: usize = 5;

/// Clone and checkout operations.
#[derive(Clone)]
pub struct GitCommands {
    executor: Arc<dyn ProcessExecutor>,
    depth: u32,
    timeout: Option<Duration>,
}

impl GitCommands {
    /// `depth` 0 clones full history.
    pub fn new(executor: Arc<dyn ProcessExecutor>, depth: u32, timeout: Option<Duration>) -> Self {
        Self {
            executor,
            depth,
            timeout,
        }
    }

    /// Clone `url` into `dest`, which must not exist yet, and check out `reference`.
    ///
    /// A shallow `--branch` clone is tried first. Refs that `--branch` cannot
    /// take (commit hashes) fall back to a full clone followed by a checkout.
    pub async fn clone_repo(
        &self,
        url: &str,
        dest: &Path,
        reference: Option<&str>,
    ) -> Result<(), GitError> {
        let dest_arg = dest.to_string_lossy().into_owned();
        let mut args = vec!["clone".to_string()];
        if self.depth > 0 {
            args.push("--depth".to_string());
            args.push(self.depth.to_string());
        }
        if let Some(reference) = reference {
            args.push("--branch".to_string());
            args.push(reference.to_string());
        }
        args.push(url.to_string());
        args.push(dest_arg.clone());

        info!("Cloning {} into {}", url, dest.display());
        match self.git("clone", args, None).await {
            Ok(_) => Ok(()),
            Err(GitError::Command { detail, .. }) if reference.is_some() => {
                debug!("Shallow clone failed ({}), retrying with full history", detail);
                if dest.exists() {
                    tokio::fs::remove_dir_all(dest).await?;
                }
                let full = vec!["clone".to_string(), url.to_string(), dest_arg];
                self.git("clone", full, None).await?;
                self.checkout(dest, reference.unwrap_or("HEAD")).await
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch `reference` (default: the remote HEAD) into an existing clone and
    /// check it out.
    pub async fn update(&self, repo_dir: &Path, reference: Option<&str>) -> Result<(), GitError> {
        let mut args = vec!["fetch".to_string()];
        if self.depth > 0 {
            args.push("--depth".to_string());
            args.push(self.depth.to_string());
        }
        args.push("origin".to_string());
        args.push(reference.unwrap_or("HEAD").to_string());

        info!("Updating {}", repo_dir.display());
        self.git("fetch", args, Some(repo_dir)).await?;
        self.checkout(repo_dir, "FETCH_HEAD").await
    }

    pub async fn checkout(&self, repo_dir: &Path, reference: &str) -> Result<(), GitError> {
        let args = vec![
            "checkout".to_string(),
            "--force".to_string(),
            reference.to_string(),
        ];
        self.git("checkout", args, Some(repo_dir)).await.map(|_| ())
    }

    async fn git(
        &self,
        operation: &str,
        args: Vec<String>,
        cwd: Option<&Path>,
    ) -> Result<ProcessOutput, GitError> {
        let mut request = ProcessRequest::new(std::iter::once("git".to_string()).chain(args))
            .with_env("GIT_TERMINAL_PROMPT", "0")
            .with_timeout(self.timeout);
        if let Some(cwd) = cwd {
            request = request.with_cwd(cwd);
        }

        let output = self.executor.execute(request).await?;
        if output.success() {
            Ok(output)
        } else {
            Err(GitError::Command {
                operation: operation.to_string(),
                exit_code: output.exit_code,
                detail: output.stderr_tail(ERROR_TAIL_LINES),
            })
        }
    }
}
