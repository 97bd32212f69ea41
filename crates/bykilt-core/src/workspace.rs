//! Per-call working directories.

use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

/// Directory that holds everything one dispatch call generates.
///
/// Lives at `<scripts_dir>/runs/<run_id>/`. The dispatcher discards it at the
/// end of the call unless the result still points into it.
#[derive(Debug, Clone)]
pub struct RunWorkspace {
    run_id: String,
    dir: PathBuf,
}

impl RunWorkspace {
    pub fn new_run_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Create the workspace for `run_id` under `scripts_dir`.
    pub async fn create(scripts_dir: &Path, run_id: &str) -> std::io::Result<Self> {
        let dir = scripts_dir.join("runs").join(run_id);
        tokio::fs::create_dir_all(&dir).await?;
        debug!("Created run workspace {}", dir.display());
        Ok(Self {
            run_id: run_id.to_string(),
            dir,
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Write `content` to `name` inside the workspace.
    pub async fn write(&self, name: &str, content: &str) -> std::io::Result<PathBuf> {
        let path = self.file(name);
        tokio::fs::write(&path, content).await?;
        Ok(path)
    }

    /// Remove the workspace and everything in it.
    pub async fn discard(&self) -> std::io::Result<()> {
        match tokio::fs::remove_dir_all(&self.dir).await {
            Ok(()) => {
                debug!("Removed run workspace {}", self.dir.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_and_write() {
        let temp_dir = TempDir::new().unwrap();
        let ws = RunWorkspace::create(temp_dir.path(), "run-1").await.unwrap();
        assert_eq!(ws.run_id(), "run-1");
        assert_eq!(ws.dir(), temp_dir.path().join("runs").join("run-1"));
        assert!(ws.dir().is_dir());

        let path = ws.write("a.py", "print(1)").await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "print(1)");
    }

    #[tokio::test]
    async fn test_run_ids_are_distinct() {
        let temp_dir = TempDir::new().unwrap();
        let a = RunWorkspace::create(temp_dir.path(), &RunWorkspace::new_run_id()).await.unwrap();
        let b = RunWorkspace::create(temp_dir.path(), &RunWorkspace::new_run_id()).await.unwrap();
        assert_ne!(a.dir(), b.dir());
    }

    #[tokio::test]
    async fn test_discard_removes_contents() {
        let temp_dir = TempDir::new().unwrap();
        let ws = RunWorkspace::create(temp_dir.path(), "run-2").await.unwrap();
        ws.write("browser_control.py", "pass\n").await.unwrap();

        ws.discard().await.unwrap();
        assert!(!ws.dir().exists());
        // second discard is a no-op
        ws.discard().await.unwrap();
    }
}
