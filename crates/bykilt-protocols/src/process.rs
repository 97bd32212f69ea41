//! Subprocess execution protocol.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ProcessError;

/// A command line to run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessRequest {
    pub argv: Vec<String>,
    /// Variables added on top of the inherited environment.
    pub env: BTreeMap<String, String>,
    pub cwd: Option<PathBuf>,
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ProcessRequest {
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_envs(mut self, env: BTreeMap<String, String>) -> Self {
        self.env.extend(env);
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessOutput {
    /// Exit code; `-1` when the process was terminated by a signal.
    pub exit_code: i32,
    pub stdout_lines: Vec<String>,
    pub stderr_lines: Vec<String>,
    pub duration: Duration,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Last `n` stderr lines joined with newlines.
    pub fn stderr_tail(&self, n: usize) -> String {
        let start = self.stderr_lines.len().saturating_sub(n);
        self.stderr_lines[start..].join("\n")
    }

    pub fn stdout_text(&self) -> String {
        self.stdout_lines.join("\n")
    }
}

/// Runs command lines.
#[async_trait]
pub trait ProcessExecutor: Send + Sync {
    /// Run `request` to completion (or until its timeout) and capture output.
    ///
    /// A non-zero exit code is a normal [`ProcessOutput`], not an error.
    async fn execute(&self, request: ProcessRequest) -> Result<ProcessOutput, ProcessError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = ProcessRequest::new(["python", "-V"])
            .with_env("A", "1")
            .with_cwd("/tmp")
            .with_timeout(Some(Duration::from_secs(3)));
        assert_eq!(request.program(), Some("python"));
        assert_eq!(request.argv.len(), 2);
        assert_eq!(request.env.get("A").map(String::as_str), Some("1"));
        assert_eq!(request.cwd, Some(PathBuf::from("/tmp")));
        assert_eq!(request.timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_empty_request_has_no_program() {
        let request = ProcessRequest::new(Vec::<String>::new());
        assert!(request.program().is_none());
    }

    #[test]
    fn test_stderr_tail() {
        let output = ProcessOutput {
            exit_code: 1,
            stderr_lines: vec!["a".into(), "b".into(), "c".into()],
            ..Default::default()
        };
        assert!(!output.success());
        assert_eq!(output.stderr_tail(2), "b\nc");
        assert_eq!(output.stderr_tail(10), "a\nb\nc");
    }
}
