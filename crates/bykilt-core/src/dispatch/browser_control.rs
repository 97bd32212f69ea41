//! `browser-control`: generated pytest/Playwright module.

use bykilt_codegen::{BrowserControlGenerator, TEST_FUNCTION};
use bykilt_protocols::{ActionKind, DispatchError, ExecutionResult};
use tracing::debug;

use super::{DispatchRequest, Dispatcher, RunContext};

const SCRIPT_FILE: &str = "browser_control.py";
const PYTEST_INI: &str = "pytest.ini";

impl Dispatcher {
    pub(super) async fn run_browser_control(
        &self,
        request: &DispatchRequest,
        ctx: &RunContext,
    ) -> Result<ExecutionResult, DispatchError> {
        let action = &request.action;
        let flow = action.require_flow()?;

        let script = BrowserControlGenerator::new()
            .with_slowmo(action.slowmo)
            .generate(flow, &request.params, request.headless)?;
        let script_path = ctx.workspace.write(SCRIPT_FILE, &script).await?;
        ctx.workspace
            .write(PYTEST_INI, BrowserControlGenerator::pytest_ini())
            .await?;
        debug!("Generated {} ({} steps)", script_path.display(), flow.len());

        let argv = vec![
            "python".to_string(),
            "-m".to_string(),
            "pytest".to_string(),
            format!("{}::{}", script_path.display(), TEST_FUNCTION),
            "-v".to_string(),
            "-s".to_string(),
        ];
        let output = self.run_process(argv, ctx.workspace.dir(), ctx).await?;

        let result = self.classify(
            request,
            ActionKind::BrowserControl,
            &output,
            Some(script_path.clone()),
            ctx,
        );
        if result.is_success() {
            self.archive(request, ActionKind::BrowserControl, &script_path, ctx)
                .await;
        }
        Ok(result)
    }
}
