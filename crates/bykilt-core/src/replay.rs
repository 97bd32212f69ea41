//! Default JSON command replay backend.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

use bykilt_codegen::template::{render_command, split_command, Slots};
use bykilt_protocols::{
    CommandReplayer, DispatchError, ParamsMap, ProcessExecutor, ProcessRequest, ReplayOutcome,
    ReplayRequest,
};

const COMMANDS_FILE_SLOT: &str = "commands_file";

/// Replays a command file by running `unlock_future.replay_command`.
///
/// The command's last stdout line that parses as a JSON object is taken as
/// the result dict. Without one, the result is `{"exit_code": n}`.
pub struct ExternalReplayer {
    executor: Arc<dyn ProcessExecutor>,
    command: Option<String>,
}

impl ExternalReplayer {
    /// `command` may contain `${commands_file}`; when it does not, the file
    /// path is appended as the last argument.
    pub fn new(executor: Arc<dyn ProcessExecutor>, command: Option<String>) -> Self {
        Self { executor, command }
    }

    fn argv(&self, commands_file: &str) -> Result<Vec<String>, DispatchError> {
        let template = self
            .command
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| DispatchError::MissingField {
                kind: "unlock-future".to_string(),
                field: "unlock_future.replay_command".to_string(),
            })?;

        let mut slots = Slots::new();
        slots.insert(COMMANDS_FILE_SLOT.to_string(), commands_file.to_string());
        let mut argv = split_command(&render_command(template, &ParamsMap::new(), &slots))?;
        if !template.contains("${commands_file}") {
            argv.push(commands_file.to_string());
        }
        Ok(argv)
    }
}

#[async_trait]
impl CommandReplayer for ExternalReplayer {
    async fn replay(&self, request: ReplayRequest) -> Result<ReplayOutcome, DispatchError> {
        let commands_file = request.commands_file.to_string_lossy().into_owned();
        let argv = self.argv(&commands_file)?;
        info!("Replaying {}", commands_file);

        let mut process = ProcessRequest::new(argv)
            .with_envs(request.env)
            .with_timeout(request.timeout);
        if let Some(cwd) = request.cwd {
            process = process.with_cwd(cwd);
        }
        let output = self.executor.execute(process).await?;

        let mut details = last_json_object(&output.stdout_lines)
            .unwrap_or_else(|| json!({ "exit_code": output.exit_code }));
        if let Some(map) = details.as_object_mut() {
            map.entry("exit_code").or_insert(json!(output.exit_code));
        }
        let reported = details.get("success").and_then(Value::as_bool).unwrap_or(true);
        debug!("Replay finished with exit code {}: {}", output.exit_code, details);

        Ok(ReplayOutcome {
            success: output.success() && reported,
            details,
        })
    }
}

fn last_json_object(lines: &[String]) -> Option<Value> {
    lines
        .iter()
        .rev()
        .map(|line| line.trim())
        .filter(|line| line.starts_with('{'))
        .find_map(|line| serde_json::from_str::<Value>(line).ok().filter(Value::is_object))
}
