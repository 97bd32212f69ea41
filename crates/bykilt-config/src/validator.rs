//! Configuration validation.

use crate::browser::BrowserType;
use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_paths(config, &mut result);
        Self::validate_execution(config, &mut result);
        Self::validate_browser(config, &mut result);
        Self::validate_git_scripts(config, &mut result);
        Self::validate_unlock_future(config, &mut result);
        Self::validate_archive(config, &mut result);

        Ok(result)
    }

    fn validate_paths(config: &Config, result: &mut ValidationResult) {
        let paths = &config.paths;
        for (name, value) in [
            ("paths.catalog", &paths.catalog),
            ("paths.scripts_dir", &paths.scripts_dir),
            ("paths.artifacts_dir", &paths.artifacts_dir),
            ("paths.logs_dir", &paths.logs_dir),
        ] {
            if value.trim().is_empty() {
                result.add_error(ValidationError::new(name, "Path cannot be empty"));
            }
        }
    }

    fn validate_execution(config: &Config, result: &mut ValidationResult) {
        if config.execution.timeout_seconds == 0 {
            result.add_warning(ValidationWarning::new(
                "execution.timeout_seconds",
                "Timeout is disabled; a hung script will block its dispatch forever",
            ));
        }

        if config.execution.encodings.is_empty() {
            result.add_error(ValidationError::new(
                "execution.encodings",
                "At least one output encoding is required",
            ));
        }

        if let Some(python) = &config.execution.python {
            if python.trim().is_empty() {
                result.add_error(ValidationError::new(
                    "execution.python",
                    "Interpreter path cannot be empty",
                ));
            }
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        if let Err(e) = config.browser.default.parse::<BrowserType>() {
            result.add_error(ValidationError::new("browser.default", e.to_string()));
        }

        for (name, profile) in &config.browser.profiles {
            let path = format!("browser.profiles.{}", name);
            if name.parse::<BrowserType>().is_err() {
                result.add_error(ValidationError::new(&path, "Unknown browser name"));
            }
            if profile.debug_port == Some(0) {
                result.add_error(ValidationError::new(
                    format!("{}.debug_port", path),
                    "Port cannot be 0",
                ));
            }
        }
    }

    fn validate_git_scripts(config: &Config, result: &mut ValidationResult) {
        for (name, entry) in &config.git_script.scripts {
            let path = format!("git_script.scripts.{}", name);
            if entry.git.trim().is_empty() {
                result.add_error(ValidationError::new(
                    format!("{}.git", path),
                    "Repository URL cannot be empty",
                ));
            }
            if entry.script_path.trim().is_empty() {
                result.add_error(ValidationError::new(
                    format!("{}.script_path", path),
                    "Script path cannot be empty",
                ));
            }
        }
    }

    fn validate_unlock_future(config: &Config, result: &mut ValidationResult) {
        match &config.unlock_future.replay_command {
            None => result.add_warning(ValidationWarning::new(
                "unlock_future.replay_command",
                "Not set; unlock-future actions will fail",
            )),
            Some(command) if !command.contains("${commands_file}") => {
                result.add_warning(ValidationWarning::new(
                    "unlock_future.replay_command",
                    "Does not reference ${commands_file}; the generated file is appended as the last argument",
                ))
            }
            Some(_) => {}
        }
    }

    fn validate_archive(config: &Config, result: &mut ValidationResult) {
        if config.archive.enabled && config.archive.patterns.is_empty() {
            result.add_warning(ValidationWarning::new(
                "archive.patterns",
                "Archiving is enabled but no file patterns are configured",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
