//! Recording directory resolution.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::env::EnvLookup;
use crate::error::ConfigError;
use crate::loader::ConfigLoader;

pub const RECORDING_PATH_ENV: &str = "RECORDING_PATH";

/// Default recording location for one run: `<artifacts>/runs/<run_id>-art/videos`.
pub fn run_scoped_recording_dir(artifacts_dir: &Path, run_id: &str) -> PathBuf {
    artifacts_dir
        .join("runs")
        .join(format!("{}-art", run_id))
        .join("videos")
}

/// Pick the recording directory and make sure it exists.
///
/// Precedence: a non-empty `explicit` path, then a non-empty `RECORDING_PATH`,
/// then `default_dir`. The returned path is absolute.
pub fn resolve_recording_dir(
    explicit: Option<&str>,
    env: &dyn EnvLookup,
    default_dir: &Path,
) -> Result<PathBuf, ConfigError> {
    let chosen = match explicit.map(str::trim).filter(|p| !p.is_empty()) {
        Some(path) => PathBuf::from(ConfigLoader::expand_path(path)),
        None => match env.var(RECORDING_PATH_ENV) {
            Some(path) => PathBuf::from(ConfigLoader::expand_path(path.trim())),
            None => default_dir.to_path_buf(),
        },
    };

    let absolute = std::path::absolute(&chosen)?;
    std::fs::create_dir_all(&absolute)?;
    debug!("Recording directory: {}", absolute.display());
    Ok(absolute)
}
