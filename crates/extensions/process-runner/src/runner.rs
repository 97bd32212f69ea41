//! Async subprocess runner.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use bykilt_protocols::{ProcessError, ProcessExecutor, ProcessOutput, ProcessRequest};

use crate::decode::OutputDecoder;
use crate::interpreter::normalize_argv;

/// How long to wait for the output readers after a timed-out child was killed.
const DRAIN_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Runs command lines with `tokio::process`.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    decoder: Arc<OutputDecoder>,
    interpreter: Option<PathBuf>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_decoder(mut self, decoder: OutputDecoder) -> Self {
        self.decoder = Arc::new(decoder);
        self
    }

    /// Interpreter substituted for a leading `python`/`python3`.
    pub fn with_interpreter(mut self, interpreter: Option<PathBuf>) -> Self {
        self.interpreter = interpreter;
        self
    }

    pub fn interpreter(&self) -> Option<&Path> {
        self.interpreter.as_deref()
    }
}

#[async_trait]
impl ProcessExecutor for ProcessRunner {
    async fn execute(&self, request: ProcessRequest) -> Result<ProcessOutput, ProcessError> {
        let argv = normalize_argv(&request.argv, self.interpreter.as_deref());
        let (program, args) = argv.split_first().ok_or(ProcessError::EmptyCommand)?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .envs(&request.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = &request.cwd {
            cmd.current_dir(cwd);
        }
        // Own process group so a timeout can take down grandchildren too.
        #[cfg(unix)]
        cmd.process_group(0);

        info!("Running: {}", argv.join(" "));
        let started = Instant::now();
        let mut child = cmd.spawn().map_err(|source| ProcessError::Spawn {
            program: program.clone(),
            source,
        })?;

        let mut stdout_task = child
            .stdout
            .take()
            .map(|out| spawn_reader(out, Stream::Stdout, self.decoder.clone()));
        let mut stderr_task = child
            .stderr
            .take()
            .map(|err| spawn_reader(err, Stream::Stderr, self.decoder.clone()));

        let status = match request.timeout {
            Some(limit) => match timeout(limit, child.wait()).await {
                Ok(status) => status?,
                Err(_) => {
                    warn!(
                        "Process '{}' exceeded {}s timeout, killing it",
                        program,
                        limit.as_secs()
                    );
                    terminate(&mut child).await;
                    let stdout_lines = drain(&mut stdout_task, Some(DRAIN_GRACE)).await;
                    let stderr_lines = drain(&mut stderr_task, Some(DRAIN_GRACE)).await;
                    return Err(ProcessError::Timeout {
                        seconds: limit.as_secs(),
                        stdout_lines,
                        stderr_lines,
                    });
                }
            },
            None => child.wait().await?,
        };

        let stdout_lines = drain(&mut stdout_task, None).await;
        let stderr_lines = drain(&mut stderr_task, None).await;
        let duration = started.elapsed();
        let exit_code = status.code().unwrap_or(-1);

        debug!(
            "Process '{}' exited with code {} after {:?}",
            program, exit_code, duration
        );

        Ok(ProcessOutput {
            exit_code,
            stdout_lines,
            stderr_lines,
            duration,
        })
    }
}

fn spawn_reader<R>(stream: R, kind: Stream, decoder: Arc<OutputDecoder>) -> JoinHandle<Vec<String>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        let mut lines = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = decoder.decode(&buf);
                    match kind {
                        Stream::Stdout => info!(target: "bykilt::process", "{}", line),
                        Stream::Stderr => warn!(target: "bykilt::process", "{}", line),
                    }
                    lines.push(line);
                }
                Err(e) => {
                    warn!("Failed to read {:?}: {}", kind, e);
                    break;
                }
            }
        }
        lines
    })
}

/// Collect a reader's lines, giving up after `grace` if one is set.
async fn drain(task: &mut Option<JoinHandle<Vec<String>>>, grace: Option<Duration>) -> Vec<String> {
    let Some(handle) = task.as_mut() else {
        return Vec::new();
    };

    let joined = match grace {
        Some(grace) => match timeout(grace, &mut *handle).await {
            Ok(joined) => joined,
            Err(_) => {
                handle.abort();
                debug!("Output reader did not finish within {:?}", grace);
                return Vec::new();
            }
        },
        None => handle.await,
    };

    joined.unwrap_or_else(|e| {
        warn!("Output reader task failed: {}", e);
        Vec::new()
    })
}

async fn terminate(child: &mut Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Some(pid) = child.id() {
            if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
                debug!("killpg({}) failed: {}", pid, e);
            }
        }
    }

    if let Err(e) = child.kill().await {
        debug!("Failed to kill child: {}", e);
    }
}

#[cfg(all(test, unix))]
#[path = "runner_tests.rs"]
mod tests;
