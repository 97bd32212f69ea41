use super::*;
use tempfile::TempDir;

const SCRIPT: &str = "\
from playwright.sync_api import sync_playwright

def run():
    with sync_playwright() as p:
        browser = p.chromium.launch(headless=False)
        page = browser.new_page()
";

#[test]
fn test_patch_launch_and_add_import() {
    let (patched, outcome) = patch_launch_boilerplate(SCRIPT).unwrap();
    assert_eq!(outcome.launches_patched, 1);
    assert!(outcome.import_added);
    assert!(patched.starts_with("import os\n"));
    assert!(patched.contains(
        r#"p.chromium.launch(executable_path=os.environ.get("BROWSER_EXECUTABLE_PATH") or None, headless=False)"#
    ));
}

#[test]
fn test_existing_os_import_kept() {
    let script = format!("import json, os\n{}", SCRIPT);
    let (patched, outcome) = patch_launch_boilerplate(&script).unwrap();
    assert!(!outcome.import_added);
    assert_eq!(patched.matches("import os").count(), 0);
    assert!(patched.starts_with("import json, os\n"));
}

#[test]
fn test_future_import_stays_first() {
    let script = format!("#!/usr/bin/env python\nfrom __future__ import annotations\n{}", SCRIPT);
    let (patched, _) = patch_launch_boilerplate(&script).unwrap();
    let lines: Vec<&str> = patched.lines().collect();
    assert_eq!(lines[0], "#!/usr/bin/env python");
    assert_eq!(lines[1], "from __future__ import annotations");
    assert_eq!(lines[2], "import os");
}

#[test]
fn test_multiple_launches() {
    let script = "import os\na = pw.chromium.launch()\nb = other.chromium.launch(args=[])\n";
    let (patched, outcome) = patch_launch_boilerplate(script).unwrap();
    assert_eq!(outcome.launches_patched, 2);
    assert_eq!(patched.matches("BROWSER_EXECUTABLE_PATH").count(), 2);
}

#[test]
fn test_no_launch_is_not_found() {
    assert!(patch_launch_boilerplate("print('hello')\n").is_none());
    assert!(patch_launch_boilerplate("p.firefox.launch()\n").is_none());
}

#[test]
fn test_already_patched_is_unchanged() {
    let (once, _) = patch_launch_boilerplate(SCRIPT).unwrap();
    let (twice, outcome) = patch_launch_boilerplate(&once).unwrap();
    assert_eq!(once, twice);
    assert_eq!(outcome.launches_patched, 0);
}

#[test]
fn test_existing_executable_path_becomes_fallback() {
    let script = "import os\nb = p.chromium.launch(executable_path=\"/opt/chrome\", headless=True)\n";
    let (patched, outcome) = patch_launch_boilerplate(script).unwrap();
    assert_eq!(outcome.launches_patched, 1);
    assert_eq!(patched.matches("executable_path=").count(), 1);
    assert!(patched.contains(
        r#"p.chromium.launch(executable_path=os.environ.get("BROWSER_EXECUTABLE_PATH") or ("/opt/chrome"), headless=True)"#
    ));

    let (twice, outcome) = patch_launch_boilerplate(&patched).unwrap();
    assert_eq!(twice, patched);
    assert_eq!(outcome.launches_patched, 0);
}

#[test]
fn test_executable_path_last_and_nested() {
    let script = "\
import os
b = p.chromium.launch(
    args=[\"--a, b\", f(1, 2)],  # executable_path=ignored
    executable_path=pick(\"x\", \")\"),
)
";
    let (patched, outcome) = patch_launch_boilerplate(script).unwrap();
    assert_eq!(outcome.launches_patched, 1);
    assert!(patched.contains(
        r#"executable_path=os.environ.get("BROWSER_EXECUTABLE_PATH") or (pick("x", ")")),"#
    ));
    assert!(patched.contains(r#"args=["--a, b", f(1, 2)],  # executable_path=ignored"#));
    assert!(patched.ends_with("\n)\n"));
}

#[test]
fn test_trailing_comment_stays_outside_value() {
    let script = "import os\nb = p.chromium.launch(\n    executable_path=\"/opt/chrome\"  # local build\n)\n";
    let (patched, _) = patch_launch_boilerplate(script).unwrap();
    assert!(patched.contains(
        "executable_path=os.environ.get(\"BROWSER_EXECUTABLE_PATH\") or (\"/opt/chrome\")  # local build\n)"
    ));
}

#[test]
fn test_only_unpatched_launches_counted() {
    let (once, _) = patch_launch_boilerplate(SCRIPT).unwrap();
    let script = format!("{}    other = p.chromium.launch()\n", once);
    let (patched, outcome) = patch_launch_boilerplate(&script).unwrap();
    assert_eq!(outcome.launches_patched, 1);
    assert!(!outcome.import_added);
    assert_eq!(patched.matches("BROWSER_EXECUTABLE_PATH").count(), 2);
}

#[test]
fn test_patch_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("run.py");
    std::fs::write(&path, SCRIPT).unwrap();

    let outcome = patch_script_file(&path).unwrap();
    assert_eq!(outcome.launches_patched, 1);
    assert!(std::fs::read_to_string(&path).unwrap().contains("BROWSER_EXECUTABLE_PATH"));
}

#[test]
fn test_patch_file_without_target() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("run.py");
    std::fs::write(&path, "print('no browser')\n").unwrap();

    let err = patch_script_file(&path).unwrap_err();
    assert!(matches!(err, GitError::PatchTargetNotFound(ref p) if p == &path));
}
