//! Command-template strategies: `action_runner_template` and `script`.

use bykilt_codegen::template::{render_command, split_command, Slots};
use bykilt_protocols::{ActionKind, DispatchError, ExecutionResult};

use super::{DispatchRequest, Dispatcher, RunContext};

impl Dispatcher {
    /// `${action_script}` and `${template}` slots; no artifact path.
    pub(super) async fn run_action_runner_template(
        &self,
        request: &DispatchRequest,
        ctx: &RunContext,
    ) -> Result<ExecutionResult, DispatchError> {
        let action = &request.action;
        let action_script = action.require("action_script", &action.action_script)?;
        let command = action.require("command", &action.command)?;
        let template = action
            .template
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(action_script);

        let mut slots = Slots::new();
        slots.insert("action_script".to_string(), action_script.to_string());
        slots.insert("template".to_string(), template.to_string());
        let argv = split_command(&render_command(command, &request.params, &slots))?;

        let output = self.run_process(argv, &self.work_dir, ctx).await?;
        Ok(self.classify(request, ActionKind::ActionRunnerTemplate, &output, None, ctx))
    }

    /// Script from the local scripts directory, run from that directory.
    pub(super) async fn run_script(
        &self,
        request: &DispatchRequest,
        ctx: &RunContext,
    ) -> Result<ExecutionResult, DispatchError> {
        let action = &request.action;
        let script = action.require("script", &action.script)?;
        let command = action.require("command", &action.command)?;

        let scripts_dir = self.config.paths.scripts_dir(&self.work_dir);
        let script_path = scripts_dir.join(script);
        if !script_path.is_file() {
            return Err(DispatchError::Resolution(format!(
                "script '{}' not found in {}",
                script,
                scripts_dir.display()
            )));
        }

        let mut slots = Slots::new();
        slots.insert(
            "script_path".to_string(),
            script_path.to_string_lossy().into_owned(),
        );
        slots.insert("script".to_string(), script.to_string());
        let argv = split_command(&render_command(command, &request.params, &slots))?;

        let output = self.run_process(argv, &scripts_dir, ctx).await?;
        Ok(self.classify(request, ActionKind::Script, &output, Some(script_path), ctx))
    }
}
