//! Persistent clone cache.

use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::OwnedMutexGuard;

/// Directory name for a repository URL: a readable part plus a short hash of
/// the full URL.
pub fn repo_slug(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    let without_scheme = trimmed
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(trimmed);
    let without_user = without_scheme
        .split_once('@')
        .map(|(_, rest)| rest)
        .unwrap_or(without_scheme);

    let readable: String = without_user
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let readable = readable.trim_matches(|c| c == '_' || c == '.');

    let digest = format!("{:x}", Sha256::digest(url.trim().as_bytes()));
    if readable.is_empty() {
        format!("repo-{}", &digest[..8])
    } else {
        format!("{}-{}", readable, &digest[..8])
    }
}

/// Clone cache rooted at one directory, with one async lock per repository.
#[derive(Debug)]
pub struct RepoCache {
    root: PathBuf,
    locks: Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>,
}

impl RepoCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn repo_dir(&self, url: &str) -> PathBuf {
        self.root.join(repo_slug(url))
    }

    /// Exclusive access to `repo_dir` until the guard is dropped.
    pub async fn lock(&self, repo_dir: &Path) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock();
            locks.entry(repo_dir.to_path_buf()).or_default().clone()
        };
        lock.lock_owned().await
    }
}
