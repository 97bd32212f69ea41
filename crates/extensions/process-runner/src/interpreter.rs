//! Python interpreter resolution.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use bykilt_config::EnvLookup;

/// Overrides every other interpreter source.
pub const PYTHON_ENV: &str = "BYKILT_PYTHON";

/// The interpreter substituted for bare `python`/`python3` commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonInterpreter {
    path: PathBuf,
    source: &'static str,
}

impl PythonInterpreter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            source: "explicit",
        }
    }

    /// Resolve the interpreter, in order: `BYKILT_PYTHON`, the configured
    /// `execution.python`, `$VIRTUAL_ENV`, then `python3`/`python` on `PATH`.
    ///
    /// Returns `None` when nothing is found; commands then run unchanged.
    pub fn resolve(configured: Option<&str>, env: &dyn EnvLookup) -> Option<Self> {
        let explicit = [
            (env.var(PYTHON_ENV), PYTHON_ENV),
            (configured.map(str::to_string), "config"),
        ];
        for (value, source) in explicit {
            let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
                continue;
            };
            match locate(value.trim()) {
                Some(path) => return Some(Self::found(path, source)),
                None => warn!("Python interpreter '{}' from {} not found", value, source),
            }
        }

        if let Some(venv) = env.var("VIRTUAL_ENV") {
            let candidate = venv_python(Path::new(&venv));
            if candidate.is_file() {
                return Some(Self::found(candidate, "VIRTUAL_ENV"));
            }
            debug!("No interpreter at {}", candidate.display());
        }

        ["python3", "python"]
            .into_iter()
            .find_map(|name| which::which(name).ok())
            .map(|path| Self::found(path, "PATH"))
    }

    fn found(path: PathBuf, source: &'static str) -> Self {
        let path = std::path::absolute(&path).unwrap_or(path);
        debug!("Using Python interpreter {} (from {})", path.display(), source);
        Self { path, source }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the interpreter was found.
    pub fn source(&self) -> &'static str {
        self.source
    }
}

/// A bare command name is looked up on `PATH`; anything with a separator is
/// taken as a path.
fn locate(value: &str) -> Option<PathBuf> {
    let candidate = PathBuf::from(value);
    if candidate.components().count() > 1 || candidate.is_absolute() {
        Some(candidate)
    } else {
        which::which(value).ok()
    }
}

#[cfg(windows)]
fn venv_python(venv: &Path) -> PathBuf {
    venv.join("Scripts").join("python.exe")
}

#[cfg(not(windows))]
fn venv_python(venv: &Path) -> PathBuf {
    venv.join("bin").join("python")
}

/// Replace a leading `python`/`python3` token with `interpreter`.
///
/// Only an exact match is rewritten; `python3.11` or `/usr/bin/python` are left
/// alone.
pub fn normalize_argv(argv: &[String], interpreter: Option<&Path>) -> Vec<String> {
    let mut argv = argv.to_vec();
    if let (Some(first), Some(interpreter)) = (argv.first_mut(), interpreter) {
        if first == "python" || first == "python3" {
            *first = interpreter.to_string_lossy().into_owned();
        }
    }
    argv
}
