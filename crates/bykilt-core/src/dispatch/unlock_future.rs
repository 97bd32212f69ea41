//! `unlock-future`: JSON command file handed to the replay backend.

use bykilt_codegen::CommandTranslator;
use bykilt_protocols::{DispatchError, ExecutionResult, FailureKind, ReplayRequest};
use tracing::info;

use super::{DispatchRequest, Dispatcher, RunContext};

impl Dispatcher {
    pub(super) async fn run_unlock_future(
        &self,
        request: &DispatchRequest,
        ctx: &RunContext,
    ) -> Result<ExecutionResult, DispatchError> {
        let action = &request.action;
        let settings = &self.config.unlock_future;

        // Inline flows win; otherwise the flow comes from the catalog entry.
        let commands_file = if action.flow.as_ref().is_some_and(|f| !f.is_empty()) {
            CommandTranslator::translate_action(
                action,
                &request.params,
                settings.maintain_session,
                &settings.tab_strategy,
                ctx.workspace.dir(),
            )?
        } else {
            CommandTranslator::translate(
                action.display_name(),
                &request.params,
                &self.catalog,
                settings.maintain_session,
                &settings.tab_strategy,
                ctx.workspace.dir(),
            )?
        };
        info!("Translated '{}' to {}", action.display_name(), commands_file.display());

        let outcome = self
            .replayer
            .replay(ReplayRequest {
                commands_file: commands_file.clone(),
                env: ctx.env.vars().clone(),
                cwd: Some(ctx.workspace.dir().to_path_buf()),
                timeout: ctx.timeout,
            })
            .await?;

        if outcome.success {
            return Ok(ExecutionResult::success(
                format!(
                    "unlock-future action '{}' executed successfully",
                    action.display_name()
                ),
                Some(commands_file),
            ));
        }

        let exit_code = outcome
            .details
            .get("exit_code")
            .and_then(|c| c.as_i64())
            .filter(|c| *c != 0)
            .unwrap_or(1) as i32;
        Ok(ExecutionResult::failure(
            FailureKind::Execution { exit_code },
            format!(
                "unlock-future action '{}' replay failed: {}",
                action.display_name(),
                outcome.details
            ),
            Some(commands_file),
        ))
    }
}
