//! Environment exported to script subprocesses.

use std::collections::BTreeMap;
use std::path::Path;

use bykilt_config::{BrowserSettings, RECORDING_PATH_ENV};

pub const HEADLESS_ENV: &str = "BYKILT_HEADLESS";
pub const OUTPUT_DIR_ENV: &str = "BYKILT_OUTPUT_DIR";
pub const RUN_ID_ENV: &str = "BYKILT_RUN_ID";

/// Variables added on top of the inherited environment for one dispatch call.
///
/// Everything a script needs to know about the browser and the run is passed
/// here, so concurrent calls never observe each other's settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptEnvironment {
    vars: BTreeMap<String, String>,
}

impl ScriptEnvironment {
    pub fn new(run_id: &str, browser: &BrowserSettings, headless: bool, output_dir: &Path) -> Self {
        let mut vars = browser.to_env();
        vars.insert(RUN_ID_ENV.to_string(), run_id.to_string());
        vars.insert(HEADLESS_ENV.to_string(), headless.to_string());
        vars.insert(
            OUTPUT_DIR_ENV.to_string(),
            output_dir.to_string_lossy().into_owned(),
        );
        vars.insert("PYTHONIOENCODING".to_string(), "utf-8".to_string());
        Self { vars }
    }

    pub fn with_recording_dir(mut self, dir: &Path) -> Self {
        self.vars.insert(
            RECORDING_PATH_ENV.to_string(),
            dir.to_string_lossy().into_owned(),
        );
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }

    pub fn into_vars(self) -> BTreeMap<String, String> {
        self.vars
    }
}
