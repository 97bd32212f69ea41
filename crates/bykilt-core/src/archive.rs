//! Artifact archiving after successful runs.

use async_trait::async_trait;
use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use bykilt_codegen::sanitize_name;
use bykilt_config::ArchiveConfig;
use bykilt_protocols::ActionKind;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to write metadata: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("Archive task failed: {0}")]
    Task(String),
}

/// What to archive for one finished run.
#[derive(Debug, Clone)]
pub struct ArchiveRequest {
    pub action_name: String,
    pub kind: ActionKind,
    /// The generated or executed script.
    pub primary_path: PathBuf,
    /// Per-call workspace the run wrote into.
    pub workspace_dir: PathBuf,
}

/// Stores artifacts of a successful run.
#[async_trait]
pub trait ArtifactArchiver: Send + Sync {
    /// Archive the run and return the archive directory, or `None` when this
    /// kind of action is not archived.
    async fn archive(&self, request: &ArchiveRequest) -> Result<Option<PathBuf>, ArchiveError>;
}

#[derive(Debug, Serialize)]
struct ArchiveMetadata<'a> {
    script_type: &'static str,
    action_name: &'a str,
    timestamp: String,
    original_path: String,
    files: &'a [String],
}

/// Copies artifacts into `<artifacts_dir>/runs/<type>_<name>_<timestamp>/`.
#[derive(Debug, Clone)]
pub struct FsArchiver {
    artifacts_dir: PathBuf,
    patterns: Vec<glob::Pattern>,
    cache_dirs: Vec<String>,
}

impl FsArchiver {
    /// Invalid patterns are logged and skipped.
    pub fn new(artifacts_dir: impl Into<PathBuf>, config: &ArchiveConfig) -> Self {
        let patterns = config
            .patterns
            .iter()
            .filter_map(|p| match glob::Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Ignoring invalid archive pattern '{}': {}", p, e);
                    None
                }
            })
            .collect();
        Self {
            artifacts_dir: artifacts_dir.into(),
            patterns,
            cache_dirs: config.cache_dirs.clone(),
        }
    }

    pub fn artifacts_dir(&self) -> &Path {
        &self.artifacts_dir
    }

    fn matches(&self, file_name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(file_name))
    }

    fn archive_blocking(&self, request: &ArchiveRequest) -> Result<PathBuf, ArchiveError> {
        let now = Local::now();
        let dest = self.artifacts_dir.join("runs").join(format!(
            "{}_{}_{}",
            request.kind,
            sanitize_name(&request.action_name),
            now.format("%Y%m%d_%H%M%S_%3f")
        ));
        fs::create_dir_all(&dest)?;

        let mut files: Vec<String> = Vec::new();

        if let Some(name) = request.primary_path.file_name() {
            if request.primary_path.is_file() {
                fs::copy(&request.primary_path, dest.join(name))?;
                files.push(name.to_string_lossy().into_owned());
            }
        }

        if request.workspace_dir.is_dir() {
            for entry in fs::read_dir(&request.workspace_dir)? {
                let entry = entry?;
                let name = entry.file_name().to_string_lossy().into_owned();
                if !entry.file_type()?.is_file() || files.contains(&name) || !self.matches(&name) {
                    continue;
                }
                fs::copy(entry.path(), dest.join(&name))?;
                files.push(name);
            }

            for dir in &self.cache_dirs {
                let source = request.workspace_dir.join(dir);
                if source.is_dir() {
                    copy_tree(&request.workspace_dir, &source, &dest, &mut files)?;
                }
            }
        }

        let metadata = ArchiveMetadata {
            script_type: request.kind.as_str(),
            action_name: &request.action_name,
            timestamp: now.to_rfc3339(),
            original_path: request.primary_path.to_string_lossy().into_owned(),
            files: &files,
        };
        fs::write(
            dest.join("metadata.json"),
            serde_json::to_string_pretty(&metadata)?,
        )?;

        info!(
            "Archived {} file(s) for '{}' to {}",
            files.len(),
            request.action_name,
            dest.display()
        );
        Ok(dest)
    }
}

/// Copy `source` (inside `root`) into `dest`, keeping paths relative to `root`.
fn copy_tree(
    root: &Path,
    source: &Path,
    dest: &Path,
    files: &mut Vec<String>,
) -> Result<(), ArchiveError> {
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|e| ArchiveError::Walk {
            path: source.to_path_buf(),
            source: e,
        })?;
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target)?;
            files.push(relative.to_string_lossy().into_owned());
        }
    }
    Ok(())
}

#[async_trait]
impl ArtifactArchiver for FsArchiver {
    async fn archive(&self, request: &ArchiveRequest) -> Result<Option<PathBuf>, ArchiveError> {
        if request.kind != ActionKind::BrowserControl {
            debug!("{} actions are not archived", request.kind);
            return Ok(None);
        }

        let archiver = self.clone();
        let request = request.clone();
        tokio::task::spawn_blocking(move || archiver.archive_blocking(&request))
            .await
            .map_err(|e| ArchiveError::Task(e.to_string()))?
            .map(Some)
    }
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
