use super::*;

#[test]
fn test_success_result() {
    let result = ExecutionResult::success(
        "Script executed successfully",
        Some(PathBuf::from("/tmp/run/browser_control.py")),
    );
    assert!(result.is_success());
    assert_eq!(result.failure_kind(), None);
    assert_eq!(result.path(), Some(Path::new("/tmp/run/browser_control.py")));
    assert!(result.message().contains("executed successfully"));
}

#[test]
fn test_failure_message_embeds_exit_code() {
    let result = ExecutionResult::failure(
        FailureKind::Execution { exit_code: 3 },
        "Script execution failed with exit code 3",
        None,
    );
    assert!(!result.is_success());
    let message = result.message();
    assert!(message.contains('3'));
    assert!(!message.contains("executed successfully"));
}

#[test]
fn test_into_legacy() {
    let (message, path) = ExecutionResult::success("ok executed successfully", None).into_legacy();
    assert_eq!(message, "ok executed successfully");
    assert!(path.is_none());

    let (message, path) = ExecutionResult::failure(
        FailureKind::Resolution,
        "script missing",
        Some(PathBuf::from("/x/y.py")),
    )
    .into_legacy();
    assert!(message.starts_with("Error (resolution error)"));
    assert_eq!(path.as_deref(), Some("/x/y.py"));
}

#[test]
fn test_serialize_failure() {
    let result = ExecutionResult::failure(FailureKind::Execution { exit_code: 1 }, "boom", None);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["status"], "failure");
    assert_eq!(json["kind"], "execution");
    assert_eq!(json["exit_code"], 1);
    assert_eq!(json["detail"], "boom");
    assert!(json.get("path").is_none());
}

#[test]
fn test_serialize_success() {
    let result = ExecutionResult::success("done", Some(PathBuf::from("a.json")));
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["status"], "success");
    assert_eq!(json["path"], "a.json");
}

#[test]
fn test_failure_kind_display() {
    assert_eq!(FailureKind::Timeout.to_string(), "timeout");
    assert!(FailureKind::Execution { exit_code: 9 }.to_string().contains('9'));
}
