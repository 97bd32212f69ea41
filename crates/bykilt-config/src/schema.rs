//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::loader::ConfigLoader;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub execution: ExecutionConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub recording: RecordingConfig,

    #[serde(default)]
    pub git_script: GitScriptConfig,

    #[serde(default)]
    pub unlock_future: UnlockFutureConfig,

    #[serde(default)]
    pub archive: ArchiveConfig,
}

/// Filesystem layout. Relative paths are resolved against the working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Action catalog (YAML).
    #[serde(default = "default_catalog")]
    pub catalog: String,

    /// Local scripts and per-call workspaces.
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: String,

    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: String,

    #[serde(default = "default_logs_dir")]
    pub logs_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            scripts_dir: default_scripts_dir(),
            artifacts_dir: default_artifacts_dir(),
            logs_dir: default_logs_dir(),
        }
    }
}

fn default_catalog() -> String {
    "llms.txt".to_string()
}

fn default_scripts_dir() -> String {
    "myscript".to_string()
}

fn default_artifacts_dir() -> String {
    "artifacts".to_string()
}

fn default_logs_dir() -> String {
    "logs".to_string()
}

impl PathsConfig {
    pub fn catalog_path(&self, work_dir: &Path) -> PathBuf {
        resolve_against(work_dir, &self.catalog)
    }

    pub fn scripts_dir(&self, work_dir: &Path) -> PathBuf {
        resolve_against(work_dir, &self.scripts_dir)
    }

    pub fn artifacts_dir(&self, work_dir: &Path) -> PathBuf {
        resolve_against(work_dir, &self.artifacts_dir)
    }

    pub fn logs_dir(&self, work_dir: &Path) -> PathBuf {
        resolve_against(work_dir, &self.logs_dir)
    }
}

/// Expand `~` and join relative paths onto `base`.
pub fn resolve_against(base: &Path, path: &str) -> PathBuf {
    let expanded = PathBuf::from(ConfigLoader::expand_path(path));
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

/// Subprocess execution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Deadline for one script run; `0` disables the timeout.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Python interpreter used for `python`/`python3` commands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,

    /// Output decoding chain, tried in order.
    #[serde(default = "default_encodings")]
    pub encodings: Vec<String>,

    /// stderr lines kept in failure details.
    #[serde(default = "default_stderr_tail_lines")]
    pub stderr_tail_lines: usize,

    /// Keep every per-call workspace instead of removing the ones nothing
    /// refers to once the call ends.
    #[serde(default)]
    pub keep_workspaces: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            python: None,
            encodings: default_encodings(),
            stderr_tail_lines: default_stderr_tail_lines(),
            keep_workspaces: false,
        }
    }
}

impl ExecutionConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }
}

fn default_timeout_seconds() -> u64 {
    600
}

fn default_encodings() -> Vec<String> {
    vec![
        "utf-8".to_string(),
        "shift_jis".to_string(),
        "windows-1252".to_string(),
    ]
}

fn default_stderr_tail_lines() -> usize {
    20
}

/// Browser selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Browser used when neither the caller nor `DEFAULT_BROWSER` picks one.
    #[serde(default = "default_browser")]
    pub default: String,

    /// Arguments appended for every browser.
    #[serde(default)]
    pub extra_args: Vec<String>,

    /// Per-browser overrides keyed by browser name.
    #[serde(default)]
    pub profiles: BTreeMap<String, BrowserProfileConfig>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            default: default_browser(),
            extra_args: Vec::new(),
            profiles: BTreeMap::new(),
        }
    }
}

fn default_browser() -> String {
    "chrome".to_string()
}

/// Per-browser settings; environment variables take precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrowserProfileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data_dir: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_port: Option<u16>,

    #[serde(default)]
    pub extra_args: Vec<String>,
}

/// Video recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool {
    true
}

/// Git-hosted scripts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitScriptConfig {
    /// Run scripts from a persistent clone without patching them.
    /// `BYKILT_GIT_SCRIPT_NEW_METHOD` overrides this.
    #[serde(default)]
    pub use_new_method: bool,

    /// Clone cache for the new method.
    #[serde(default = "default_git_cache_dir")]
    pub cache_dir: String,

    /// `git clone --depth`; `0` clones full history.
    #[serde(default = "default_clone_depth")]
    pub clone_depth: u32,

    /// Name-based registry for actions that omit `git`/`script_path`.
    #[serde(default)]
    pub scripts: BTreeMap<String, GitScriptEntry>,
}

impl Default for GitScriptConfig {
    fn default() -> Self {
        Self {
            use_new_method: false,
            cache_dir: default_git_cache_dir(),
            clone_depth: default_clone_depth(),
            scripts: BTreeMap::new(),
        }
    }
}

fn default_git_cache_dir() -> String {
    "tmp/git_scripts".to_string()
}

fn default_clone_depth() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitScriptEntry {
    pub git: String,
    pub script_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// JSON command replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockFutureConfig {
    /// Command template; `${commands_file}` receives the generated JSON path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replay_command: Option<String>,

    #[serde(default)]
    pub maintain_session: bool,

    #[serde(default = "default_tab_strategy")]
    pub tab_strategy: String,
}

impl Default for UnlockFutureConfig {
    fn default() -> Self {
        Self {
            replay_command: None,
            maintain_session: false,
            tab_strategy: default_tab_strategy(),
        }
    }
}

fn default_tab_strategy() -> String {
    "new_tab".to_string()
}

/// Artifact archiving after successful browser-control runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// File name globs (`*` and `?`) copied from the workspace.
    #[serde(default = "default_archive_patterns")]
    pub patterns: Vec<String>,

    /// Directories copied recursively.
    #[serde(default = "default_cache_dirs")]
    pub cache_dirs: Vec<String>,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            patterns: default_archive_patterns(),
            cache_dirs: default_cache_dirs(),
        }
    }
}

fn default_archive_patterns() -> Vec<String> {
    vec![
        "*.py".to_string(),
        "pytest.ini".to_string(),
        "extracted_content*.json".to_string(),
    ]
}

fn default_cache_dirs() -> Vec<String> {
    vec![".pytest_cache".to_string(), "__pycache__".to_string()]
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
