//! `git-script`: script from a git repository.

use bykilt_codegen::template::{render_command, split_command, Slots};
use bykilt_git::{resolve_git_script, GitError, GitWorkspace, PATCHED_ENGINE};
use bykilt_protocols::{ActionKind, DispatchError, ExecutionResult};
use tracing::info;

use super::{DispatchRequest, Dispatcher, RunContext};

impl Dispatcher {
    pub(super) async fn run_git_script(
        &self,
        request: &DispatchRequest,
        ctx: &RunContext,
    ) -> Result<ExecutionResult, DispatchError> {
        let spec = resolve_git_script(&request.action, &self.config.git_script, &self.catalog)?;

        // The checkout must outlive the process: dropping it removes scratch
        // clones and releases the cache lock.
        let checkout = if GitWorkspace::use_new_method(&self.config.git_script, self.env.as_ref()) {
            info!("Using cached clone of {}", spec.git);
            self.git.prepare_cached(&spec).await?
        } else {
            // Patched launch calls only redirect chromium
            let engine = ctx.browser.engine();
            if engine != PATCHED_ENGINE {
                return Err(GitError::UnsupportedEngine {
                    browser: ctx.browser.as_str().to_string(),
                    engine: engine.to_string(),
                    expected: PATCHED_ENGINE.to_string(),
                }
                .into());
            }
            self.git.prepare_scratch(&spec).await?
        };

        let mut slots = Slots::new();
        slots.insert(
            "script_path".to_string(),
            checkout.script.to_string_lossy().into_owned(),
        );
        let argv = split_command(&render_command(&spec.command, &request.params, &slots))?;

        let output = self.run_process(argv, &checkout.repo_dir, ctx).await?;
        Ok(self.classify(
            request,
            ActionKind::GitScript,
            &output,
            Some(checkout.script.clone()),
            ctx,
        ))
    }
}
