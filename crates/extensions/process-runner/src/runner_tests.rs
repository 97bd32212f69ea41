use super::*;
use tempfile::TempDir;

fn sh(script: &str) -> ProcessRequest {
    ProcessRequest::new(["sh", "-c", script])
}

#[tokio::test]
async fn test_echo() {
    let runner = ProcessRunner::new();
    let output = runner.execute(sh("echo hello")).await.unwrap();
    assert!(output.success());
    assert_eq!(output.stdout_lines, vec!["hello"]);
    assert!(output.stderr_lines.is_empty());
}

#[tokio::test]
async fn test_stderr_and_exit_code() {
    let runner = ProcessRunner::new();
    let output = runner.execute(sh("echo boom >&2; exit 1")).await.unwrap();
    assert_eq!(output.exit_code, 1);
    assert!(!output.success());
    assert_eq!(output.stderr_tail(20), "boom");
}

#[tokio::test]
async fn test_cwd() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("marker.txt"), "x").unwrap();

    let runner = ProcessRunner::new();
    let output = runner
        .execute(sh("ls").with_cwd(temp_dir.path()))
        .await
        .unwrap();
    assert!(output.stdout_lines.iter().any(|l| l == "marker.txt"));
}

#[tokio::test]
async fn test_env_added() {
    let runner = ProcessRunner::new();
    let output = runner
        .execute(sh("echo $BYKILT_TEST_VALUE").with_env("BYKILT_TEST_VALUE", "from-request"))
        .await
        .unwrap();
    assert_eq!(output.stdout_lines, vec!["from-request"]);
}

#[tokio::test]
async fn test_empty_command() {
    let runner = ProcessRunner::new();
    let err = runner
        .execute(ProcessRequest::new(Vec::<String>::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessError::EmptyCommand));
}

#[tokio::test]
async fn test_spawn_failure() {
    let runner = ProcessRunner::new();
    let err = runner
        .execute(ProcessRequest::new(["definitely-not-a-real-binary-bykilt"]))
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessError::Spawn { .. }));
    assert!(err.to_string().contains("definitely-not-a-real-binary-bykilt"));
}

#[tokio::test]
async fn test_timeout_kills_process_group() {
    let runner = ProcessRunner::new();
    let started = Instant::now();
    let err = runner
        .execute(
            sh("echo started; sleep 30; echo never")
                .with_timeout(Some(Duration::from_millis(300))),
        )
        .await
        .unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(10));
    match err {
        ProcessError::Timeout {
            seconds,
            stdout_lines,
            ..
        } => {
            assert_eq!(seconds, 0);
            assert_eq!(stdout_lines, vec!["started"]);
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_large_output_both_streams() {
    // More than a pipe buffer on each stream.
    let runner = ProcessRunner::new();
    let output = runner
        .execute(sh(
            "i=0; while [ $i -lt 5000 ]; do echo out-$i; echo err-$i >&2; i=$((i+1)); done",
        ))
        .await
        .unwrap();
    assert!(output.success());
    assert_eq!(output.stdout_lines.len(), 5000);
    assert_eq!(output.stderr_lines.len(), 5000);
    assert_eq!(output.stdout_lines[4999], "out-4999");
}

#[tokio::test]
async fn test_undecodable_bytes_do_not_fail() {
    let runner = ProcessRunner::new();
    let output = runner.execute(sh("printf 'caf\\351\\n'")).await.unwrap();
    assert!(output.success());
    assert_eq!(output.stdout_lines.len(), 1);
}

#[tokio::test]
async fn test_python_rewritten_to_interpreter() {
    // `sh` stands in for the interpreter so no Python install is needed.
    let sh_path = which::which("sh").unwrap();
    let runner = ProcessRunner::new().with_interpreter(Some(sh_path));
    let output = runner
        .execute(ProcessRequest::new(["python", "-c", "echo via-interpreter"]))
        .await
        .unwrap();
    assert_eq!(output.stdout_lines, vec!["via-interpreter"]);
}
