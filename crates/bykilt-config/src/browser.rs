//! Per-browser settings resolved from the environment and config.
//!
//! Each field is resolved independently with the same precedence: environment
//! variable, then the `[browser.profiles.<name>]` table, then a built-in default.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::debug;

use crate::env::EnvLookup;
use crate::error::ConfigError;
use crate::loader::ConfigLoader;
use crate::schema::{BrowserConfig, BrowserProfileConfig};

/// Environment variable consulted when the caller does not name a browser.
pub const DEFAULT_BROWSER_ENV: &str = "DEFAULT_BROWSER";

/// Pipe-delimited extra launch arguments.
pub const EXTRA_ARGS_ENV: &str = "BROWSER_EXTRA_ARGS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserType {
    Chrome,
    Edge,
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserType::Chrome => "chrome",
            BrowserType::Edge => "edge",
            BrowserType::Chromium => "chromium",
            BrowserType::Firefox => "firefox",
            BrowserType::Webkit => "webkit",
        }
    }

    /// Prefix of the `<PREFIX>_PATH`, `<PREFIX>_USER_DATA` and
    /// `<PREFIX>_DEBUGGING_PORT` variables.
    pub fn env_prefix(&self) -> &'static str {
        match self {
            BrowserType::Chrome => "CHROME",
            BrowserType::Edge => "EDGE",
            BrowserType::Chromium => "CHROMIUM",
            BrowserType::Firefox => "FIREFOX",
            BrowserType::Webkit => "WEBKIT",
        }
    }

    /// Playwright engine that drives this browser.
    pub fn engine(&self) -> &'static str {
        match self {
            BrowserType::Chrome | BrowserType::Edge | BrowserType::Chromium => "chromium",
            BrowserType::Firefox => "firefox",
            BrowserType::Webkit => "webkit",
        }
    }

    pub fn default_debug_port(&self) -> u16 {
        match self {
            BrowserType::Chrome => 9222,
            BrowserType::Edge => 9223,
            BrowserType::Chromium => 9224,
            BrowserType::Firefox => 9225,
            BrowserType::Webkit => 9226,
        }
    }
}

impl fmt::Display for BrowserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowserType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" | "google-chrome" => Ok(BrowserType::Chrome),
            "edge" | "msedge" => Ok(BrowserType::Edge),
            "chromium" => Ok(BrowserType::Chromium),
            "firefox" => Ok(BrowserType::Firefox),
            "webkit" => Ok(BrowserType::Webkit),
            other => Err(ConfigError::InvalidValue {
                field: "browser".to_string(),
                message: format!("unknown browser '{}'", other),
            }),
        }
    }
}

/// Fully resolved launch settings for one browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserSettings {
    pub browser_type: BrowserType,
    pub executable_path: Option<PathBuf>,
    pub user_data_dir: Option<PathBuf>,
    pub debug_port: u16,
    pub extra_args: Vec<String>,
}

impl BrowserSettings {
    /// Resolve settings for `requested`, falling back to `DEFAULT_BROWSER`,
    /// then `browser.default`.
    pub fn resolve(
        requested: Option<&str>,
        config: &BrowserConfig,
        env: &dyn EnvLookup,
    ) -> Result<Self, ConfigError> {
        let name = requested
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| env.var(DEFAULT_BROWSER_ENV))
            .unwrap_or_else(|| config.default.clone());
        let browser_type: BrowserType = name.parse()?;

        let empty = BrowserProfileConfig::default();
        let profile = config.profiles.get(browser_type.as_str()).unwrap_or(&empty);
        let prefix = browser_type.env_prefix();

        let executable_path = env
            .var(&format!("{}_PATH", prefix))
            .or_else(|| profile.executable_path.clone())
            .map(|p| PathBuf::from(ConfigLoader::expand_path(&p)));

        let user_data_dir = env
            .var(&format!("{}_USER_DATA", prefix))
            .or_else(|| profile.user_data_dir.clone())
            .map(|p| PathBuf::from(ConfigLoader::expand_path(&p)));

        let port_var = format!("{}_DEBUGGING_PORT", prefix);
        let debug_port = match env.var(&port_var) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                field: port_var.clone(),
                message: format!("'{}' is not a valid port", raw),
            })?,
            None => profile
                .debug_port
                .unwrap_or_else(|| browser_type.default_debug_port()),
        };

        let extra_args = match env.var(EXTRA_ARGS_ENV) {
            Some(raw) => split_args(&raw),
            None => config
                .extra_args
                .iter()
                .chain(profile.extra_args.iter())
                .cloned()
                .collect(),
        };

        debug!(
            "Resolved browser {} (executable: {:?}, port: {})",
            browser_type, executable_path, debug_port
        );

        Ok(Self {
            browser_type,
            executable_path,
            user_data_dir,
            debug_port,
            extra_args,
        })
    }

    /// Variables exported to scripts that launch this browser.
    pub fn to_env(&self) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();
        env.insert("BYKILT_BROWSER_TYPE".to_string(), self.browser_type.to_string());
        env.insert("BYKILT_BROWSER_ENGINE".to_string(), self.browser_type.engine().to_string());
        env.insert("BROWSER_DEBUG_PORT".to_string(), self.debug_port.to_string());
        if let Some(path) = &self.executable_path {
            env.insert(
                "BROWSER_EXECUTABLE_PATH".to_string(),
                path.to_string_lossy().into_owned(),
            );
        }
        if let Some(dir) = &self.user_data_dir {
            env.insert("BROWSER_USER_DATA".to_string(), dir.to_string_lossy().into_owned());
        }
        if !self.extra_args.is_empty() {
            env.insert(EXTRA_ARGS_ENV.to_string(), self.extra_args.join("|"));
        }
        env
    }
}

fn split_args(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "browser_tests.rs"]
mod tests;
