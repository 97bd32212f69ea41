//! Action dispatch.
//!
//! [`Dispatcher::dispatch`] is the single boundary where errors become
//! [`ExecutionResult`]s. Each action type has its own strategy module; routing
//! is one exhaustive match over [`ActionKind`].

mod browser_control;
mod command;
mod git_script;
mod unlock_future;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, info_span, warn, Instrument};

use bykilt_catalog::ActionCatalog;
use bykilt_config::{
    resolve_against, resolve_recording_dir, run_scoped_recording_dir, BrowserSettings, BrowserType,
    Config, ConfigError, EnvLookup, ProcessEnv,
};
use bykilt_git::GitWorkspace;
use bykilt_process::{OutputDecoder, ProcessRunner, PythonInterpreter};
use bykilt_protocols::{
    ActionDefinition, ActionKind, CommandReplayer, DispatchError, ExecutionResult, FailureKind,
    ParamsMap, ProcessExecutor, ProcessOutput, ProcessRequest,
};

use crate::archive::{ArchiveRequest, ArtifactArchiver, FsArchiver};
use crate::env::ScriptEnvironment;
use crate::replay::ExternalReplayer;
use crate::workspace::RunWorkspace;

/// One dispatch call.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub action: ActionDefinition,
    pub params: ParamsMap,
    pub headless: bool,
    /// Recording directory requested by the caller.
    pub recording_path: Option<String>,
    /// Browser requested by the caller; `None` uses the configured default.
    pub browser_type: Option<String>,
    /// Overrides `execution.timeout_seconds`. A zero duration disables the
    /// timeout, as `timeout_seconds = 0` does.
    pub timeout: Option<Duration>,
}

impl DispatchRequest {
    pub fn new(action: ActionDefinition) -> Self {
        Self {
            action,
            params: ParamsMap::new(),
            headless: true,
            recording_path: None,
            browser_type: None,
            timeout: None,
        }
    }

    pub fn with_params(mut self, params: ParamsMap) -> Self {
        self.params = params;
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_recording_path(mut self, path: Option<String>) -> Self {
        self.recording_path = path;
        self
    }

    pub fn with_browser(mut self, browser_type: Option<String>) -> Self {
        self.browser_type = browser_type;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Everything resolved for one call before its strategy runs.
pub(crate) struct RunContext {
    pub browser: BrowserType,
    pub workspace: RunWorkspace,
    pub env: ScriptEnvironment,
    pub recording_dir: Option<PathBuf>,
    /// `<artifacts>/runs/<run_id>-art` when the run-scoped default recording
    /// directory was chosen.
    pub scoped_recording: Option<PathBuf>,
    pub timeout: Option<Duration>,
}

/// Runs catalogued actions.
pub struct Dispatcher {
    config: Arc<Config>,
    work_dir: PathBuf,
    catalog: Arc<ActionCatalog>,
    executor: Arc<dyn ProcessExecutor>,
    replayer: Arc<dyn CommandReplayer>,
    archiver: Arc<dyn ArtifactArchiver>,
    env: Arc<dyn EnvLookup>,
    git: Arc<GitWorkspace>,
}

impl Dispatcher {
    /// Dispatcher with the default collaborators: a [`ProcessRunner`] using the
    /// resolved Python interpreter, the external replay command, a filesystem
    /// archiver and the process environment.
    pub fn new(config: Config, work_dir: impl Into<PathBuf>, catalog: ActionCatalog) -> Self {
        let work_dir = work_dir.into();

        let interpreter = PythonInterpreter::resolve(config.execution.python.as_deref(), &ProcessEnv);
        match &interpreter {
            Some(i) => info!("Python interpreter: {} ({})", i.path().display(), i.source()),
            None => warn!("No Python interpreter found; python commands run unchanged"),
        }
        let runner = ProcessRunner::new()
            .with_decoder(OutputDecoder::new(&config.execution.encodings))
            .with_interpreter(interpreter.map(|i| i.path().to_path_buf()));
        let executor: Arc<dyn ProcessExecutor> = Arc::new(runner);

        let archiver = Arc::new(FsArchiver::new(
            config.paths.artifacts_dir(&work_dir),
            &config.archive,
        ));

        let replayer = Arc::new(ExternalReplayer::new(
            executor.clone(),
            config.unlock_future.replay_command.clone(),
        ));
        let git = Arc::new(Self::git_workspace(&config, &work_dir, executor.clone()));

        Self {
            config: Arc::new(config),
            work_dir,
            catalog: Arc::new(catalog),
            executor,
            replayer,
            archiver,
            env: Arc::new(ProcessEnv),
            git,
        }
    }

    fn git_workspace(
        config: &Config,
        work_dir: &Path,
        executor: Arc<dyn ProcessExecutor>,
    ) -> GitWorkspace {
        GitWorkspace::new(
            executor,
            resolve_against(work_dir, &config.git_script.cache_dir),
            config.git_script.clone_depth,
            config.execution.timeout(),
        )
    }

    /// Route every subprocess (scripts, git, replay) through `executor`.
    pub fn with_executor(mut self, executor: Arc<dyn ProcessExecutor>) -> Self {
        self.git = Arc::new(Self::git_workspace(&self.config, &self.work_dir, executor.clone()));
        self.replayer = Arc::new(ExternalReplayer::new(
            executor.clone(),
            self.config.unlock_future.replay_command.clone(),
        ));
        self.executor = executor;
        self
    }

    pub fn with_replayer(mut self, replayer: Arc<dyn CommandReplayer>) -> Self {
        self.replayer = replayer;
        self
    }

    pub fn with_archiver(mut self, archiver: Arc<dyn ArtifactArchiver>) -> Self {
        self.archiver = archiver;
        self
    }

    pub fn with_env(mut self, env: Arc<dyn EnvLookup>) -> Self {
        self.env = env;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &ActionCatalog {
        &self.catalog
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Run one action. Never fails: every error is reported as a
    /// [`ExecutionResult::Failure`].
    pub async fn dispatch(&self, request: DispatchRequest) -> ExecutionResult {
        let run_id = RunWorkspace::new_run_id();
        let span = info_span!(
            "dispatch",
            run_id = %run_id,
            action = %request.action.display_name(),
            kind = %request.action.action_type,
        );

        async {
            info!("Dispatching action");
            match self.execute(&run_id, &request).await {
                Ok(result) => {
                    match &result {
                        ExecutionResult::Success { .. } => info!("{}", result.message()),
                        ExecutionResult::Failure { .. } => warn!("{}", result.message()),
                    }
                    result
                }
                Err(e) => {
                    let detail = error_chain(&e);
                    error!("Dispatch failed: {}", detail);
                    ExecutionResult::failure(e.failure_kind(), detail, None)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Run an action given as a raw `script_info` mapping and return the
    /// `(message, path)` pair.
    pub async fn dispatch_legacy(
        &self,
        script_info: &serde_json::Value,
        params: ParamsMap,
        headless: bool,
        save_recording_path: Option<&str>,
        browser_type: Option<&str>,
    ) -> (String, Option<String>) {
        let action: ActionDefinition = match serde_json::from_value(script_info.clone()) {
            Ok(action) => action,
            Err(e) => {
                return ExecutionResult::failure(
                    FailureKind::Configuration,
                    format!("invalid script_info: {}", e),
                    None,
                )
                .into_legacy();
            }
        };

        let request = DispatchRequest::new(action)
            .with_params(params)
            .with_headless(headless)
            .with_recording_path(save_recording_path.map(str::to_string))
            .with_browser(browser_type.map(str::to_string));
        self.dispatch(request).await.into_legacy()
    }

    async fn execute(
        &self,
        run_id: &str,
        request: &DispatchRequest,
    ) -> Result<ExecutionResult, DispatchError> {
        let kind = request.action.kind()?;
        let ctx = self.prepare(run_id, request).await?;

        let outcome = match kind {
            ActionKind::BrowserControl => self.run_browser_control(request, &ctx).await,
            ActionKind::GitScript => self.run_git_script(request, &ctx).await,
            ActionKind::ActionRunnerTemplate => self.run_action_runner_template(request, &ctx).await,
            ActionKind::Script => self.run_script(request, &ctx).await,
            ActionKind::UnlockFuture => self.run_unlock_future(request, &ctx).await,
        };
        self.release(&ctx, outcome.as_ref().ok()).await;
        outcome
    }

    /// Discard the call's workspace and its run-scoped recording directory
    /// when it stayed empty.
    ///
    /// The workspace survives when `execution.keep_workspaces` is set or the
    /// result path points into it.
    async fn release(&self, ctx: &RunContext, result: Option<&ExecutionResult>) {
        let workspace = ctx.workspace.dir();
        let referenced = result
            .and_then(ExecutionResult::path)
            .is_some_and(|path| path.starts_with(workspace));

        if self.config.execution.keep_workspaces || referenced {
            debug!("Keeping run workspace {}", workspace.display());
        } else if let Err(e) = ctx.workspace.discard().await {
            warn!("Failed to remove run workspace {}: {}", workspace.display(), e);
        }

        if let Some(art_dir) = &ctx.scoped_recording {
            // remove_dir refuses non-empty directories, so recordings stay
            if tokio::fs::remove_dir(art_dir.join("videos")).await.is_ok() {
                if let Err(e) = tokio::fs::remove_dir(art_dir).await {
                    debug!("Keeping {}: {}", art_dir.display(), e);
                }
            }
        }
    }

    async fn prepare(
        &self,
        run_id: &str,
        request: &DispatchRequest,
    ) -> Result<RunContext, DispatchError> {
        let browser = BrowserSettings::resolve(
            request.browser_type.as_deref(),
            &self.config.browser,
            self.env.as_ref(),
        )
        .map_err(config_error)?;

        let mut scoped_recording = None;
        let recording_dir = if self.config.recording.enabled || request.recording_path.is_some() {
            let default_dir =
                run_scoped_recording_dir(&self.config.paths.artifacts_dir(&self.work_dir), run_id);
            let dir = resolve_recording_dir(
                request.recording_path.as_deref(),
                self.env.as_ref(),
                &default_dir,
            )
            .map_err(config_error)?;
            if std::path::absolute(&default_dir).is_ok_and(|d| d == dir) {
                scoped_recording = dir.parent().map(Path::to_path_buf);
            }
            Some(dir)
        } else {
            None
        };

        let workspace =
            RunWorkspace::create(&self.config.paths.scripts_dir(&self.work_dir), run_id).await?;
        let mut env = ScriptEnvironment::new(run_id, &browser, request.headless, workspace.dir());
        if let Some(dir) = &recording_dir {
            env = env.with_recording_dir(dir);
        }

        Ok(RunContext {
            browser: browser.browser_type,
            workspace,
            env,
            recording_dir,
            scoped_recording,
            timeout: self.effective_timeout(request),
        })
    }

    fn effective_timeout(&self, request: &DispatchRequest) -> Option<Duration> {
        match request.timeout {
            Some(timeout) if timeout.is_zero() => None,
            Some(timeout) => Some(timeout),
            None => self.config.execution.timeout(),
        }
    }

    /// Run one script subprocess with the call's environment.
    pub(crate) async fn run_process(
        &self,
        argv: Vec<String>,
        cwd: &Path,
        ctx: &RunContext,
    ) -> Result<ProcessOutput, DispatchError> {
        let request = ProcessRequest::new(argv)
            .with_envs(ctx.env.vars().clone())
            .with_cwd(cwd)
            .with_timeout(ctx.timeout);
        info!("Running: {}", request.argv.join(" "));
        Ok(self.executor.execute(request).await?)
    }

    /// Exit code 0 is success; anything else is an execution failure carrying
    /// the stderr tail.
    pub(crate) fn classify(
        &self,
        request: &DispatchRequest,
        kind: ActionKind,
        output: &ProcessOutput,
        path: Option<PathBuf>,
        ctx: &RunContext,
    ) -> ExecutionResult {
        let name = request.action.display_name();

        if !output.success() {
            let mut detail = format!(
                "{} action '{}' failed with exit code {}",
                kind, name, output.exit_code
            );
            let tail = output.stderr_tail(self.config.execution.stderr_tail_lines);
            if !tail.is_empty() {
                detail.push('\n');
                detail.push_str(&tail);
            }
            return ExecutionResult::failure(
                FailureKind::Execution {
                    exit_code: output.exit_code,
                },
                detail,
                path,
            );
        }

        let mut message = format!(
            "{} action '{}' executed successfully in {:.1}s",
            kind,
            name,
            output.duration.as_secs_f64()
        );
        if request.recording_path.is_some() {
            if let Some(dir) = ctx.recording_dir.as_deref().filter(|d| is_empty_dir(d)) {
                warn!("Recording directory {} is empty after the run", dir.display());
                message.push_str(" (no recording produced)");
            }
        }
        ExecutionResult::success(message, path)
    }

    /// Archive a successful run. Failures are logged and never change the
    /// dispatch result.
    pub(crate) async fn archive(
        &self,
        request: &DispatchRequest,
        kind: ActionKind,
        primary_path: &Path,
        ctx: &RunContext,
    ) {
        if !self.config.archive.enabled {
            debug!("Archiving disabled");
            return;
        }
        let archive_request = ArchiveRequest {
            action_name: request.action.display_name().to_string(),
            kind,
            primary_path: primary_path.to_path_buf(),
            workspace_dir: ctx.workspace.dir().to_path_buf(),
        };
        if let Err(e) = self.archiver.archive(&archive_request).await {
            warn!("Archiving '{}' failed: {}", archive_request.action_name, e);
        }
    }
}

fn config_error(err: ConfigError) -> DispatchError {
    match err {
        ConfigError::Io(e) => DispatchError::Io(e),
        other => DispatchError::Configuration(other.to_string()),
    }
}

fn is_empty_dir(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(true)
}

/// Display text of `err` followed by any source not already part of it.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
