//! Launch boilerplate patching for legacy clones.
//!
//! Scripts written for a developer machine launch chromium with Playwright's
//! bundled browser. The patch makes every `<x>.chromium.launch(` call take
//! `executable_path` from `BROWSER_EXECUTABLE_PATH` so the configured browser
//! is used instead. A call that already passes `executable_path` keeps its
//! value as the fallback.

use std::fs;
use std::ops::Range;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::error::GitError;

/// Playwright engine the patched launch calls drive.
pub const PATCHED_ENGINE: &str = "chromium";

const EXECUTABLE_ENV: &str = "BROWSER_EXECUTABLE_PATH";
const EXECUTABLE_LOOKUP: &str = r#"os.environ.get("BROWSER_EXECUTABLE_PATH") or "#;
const EXECUTABLE_KWARG: &str = r#"executable_path=os.environ.get("BROWSER_EXECUTABLE_PATH") or None, "#;

static LAUNCH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\w+)\.chromium\.launch\(").expect("valid launch pattern"));

static EXECUTABLE_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*executable_path\s*=").expect("valid keyword pattern"));

static OS_IMPORT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(?:import\s+(?:[\w.]+\s*,\s*)*os\b|from\s+os\s+import\b)")
        .expect("valid import pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchOutcome {
    pub launches_patched: usize,
    pub import_added: bool,
}

/// Patch script text. `None` when no launch call is found.
///
/// Launch calls whose arguments already read `BROWSER_EXECUTABLE_PATH` are
/// left as they are, so patching twice changes nothing.
pub fn patch_launch_boilerplate(content: &str) -> Option<(String, PatchOutcome)> {
    if !LAUNCH_PATTERN.is_match(content) {
        return None;
    }

    let mut patched = String::with_capacity(content.len() + 128);
    let mut cursor = 0;
    let mut launches_patched = 0;
    for launch in LAUNCH_PATTERN.find_iter(content) {
        if launch.start() < cursor {
            continue;
        }
        let open = launch.end();
        let Some(close) = scan_code(content, open, |b, depth| b == b')' && depth == 0) else {
            continue;
        };
        let args = &content[open..close];
        if args.contains(EXECUTABLE_ENV) {
            continue;
        }

        patched.push_str(&content[cursor..open]);
        patched.push_str(&patch_arguments(args));
        cursor = close;
        launches_patched += 1;
    }
    patched.push_str(&content[cursor..]);

    if launches_patched == 0 {
        return Some((
            content.to_string(),
            PatchOutcome {
                launches_patched: 0,
                import_added: false,
            },
        ));
    }

    let import_added = !OS_IMPORT_PATTERN.is_match(&patched);
    if import_added {
        patched = insert_os_import(&patched);
    }

    Some((
        patched,
        PatchOutcome {
            launches_patched,
            import_added,
        },
    ))
}

/// Rewrite one launch argument list.
fn patch_arguments(args: &str) -> String {
    match executable_value(args) {
        Some(value) => format!(
            "{}{}({}){}",
            &args[..value.start],
            EXECUTABLE_LOOKUP,
            &args[value.clone()],
            &args[value.end..]
        ),
        None => format!("{}{}", EXECUTABLE_KWARG, args),
    }
}

/// Span of the expression passed as `executable_path=`, if any.
fn executable_value(args: &str) -> Option<Range<usize>> {
    for segment in top_level_segments(args) {
        let code_start = segment.start + skip_comments(&args[segment.clone()]);
        let text = &args[code_start..segment.end];
        let Some(keyword) = EXECUTABLE_KEYWORD.find(text) else {
            continue;
        };
        if text[keyword.end()..].starts_with('=') {
            continue;
        }
        let start = code_start + keyword.end();
        let value = &args[start..segment.end];
        let value = match scan_code(value, 0, |b, _| b == b'#') {
            Some(comment) => &value[..comment],
            None => value,
        };
        let leading = value.len() - value.trim_start().len();
        let start = start + leading;
        return Some(start..start + value.trim().len());
    }
    None
}

/// Offset past leading whitespace and comment lines.
fn skip_comments(text: &str) -> usize {
    let mut offset = 0;
    loop {
        let rest = &text[offset..];
        let trimmed = rest.trim_start();
        offset += rest.len() - trimmed.len();
        if !trimmed.starts_with('#') {
            return offset;
        }
        match trimmed.find('\n') {
            Some(newline) => offset += newline + 1,
            None => return text.len(),
        }
    }
}

/// Argument spans separated by commas outside brackets and strings.
fn top_level_segments(args: &str) -> Vec<Range<usize>> {
    let mut segments = Vec::new();
    let mut begin = 0;
    while let Some(comma) = scan_code(args, begin, |b, depth| b == b',' && depth == 0) {
        segments.push(begin..comma);
        begin = comma + 1;
    }
    segments.push(begin..args.len());
    segments
}

/// Walk Python source from `start` and return the first index outside string
/// literals and comments where `stop(byte, depth)` holds. `depth` counts
/// brackets opened since `start`.
fn scan_code(text: &str, start: usize, mut stop: impl FnMut(u8, usize) -> bool) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = start;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == b'\\' {
                    i += 2;
                    continue;
                }
                if b == q {
                    quote = None;
                }
            }
            None => {
                if stop(b, depth) {
                    return Some(i);
                }
                match b {
                    b'\'' | b'"' => quote = Some(b),
                    b'#' => {
                        while i < bytes.len() && bytes[i] != b'\n' {
                            i += 1;
                        }
                        continue;
                    }
                    b'(' | b'[' | b'{' => depth += 1,
                    b')' | b']' | b'}' => depth = depth.saturating_sub(1),
                    _ => {}
                }
            }
        }
        i += 1;
    }
    None
}

/// Patch the file at `path` in place.
pub fn patch_script_file(path: &Path) -> Result<PatchOutcome, GitError> {
    let content = fs::read_to_string(path)?;
    let (patched, outcome) = patch_launch_boilerplate(&content)
        .ok_or_else(|| GitError::PatchTargetNotFound(path.to_path_buf()))?;

    if outcome.launches_patched > 0 {
        fs::write(path, patched)?;
        info!(
            "Patched {} chromium launch call(s) in {}",
            outcome.launches_patched,
            path.display()
        );
    } else {
        debug!("{} is already patched", path.display());
    }
    Ok(outcome)
}

/// Insert `import os` after the shebang, encoding comments and any
/// `from __future__` imports.
fn insert_os_import(content: &str) -> String {
    let lines: Vec<&str> = content.split_inclusive('\n').collect();

    let mut insert_at = 0;
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim_start();
        if i == insert_at && (trimmed.starts_with("#!") || trimmed.starts_with("# -*-")) {
            insert_at = i + 1;
        }
        if trimmed.starts_with("from __future__ import") {
            insert_at = i + 1;
        }
    }

    let mut out = String::with_capacity(content.len() + 10);
    for line in &lines[..insert_at] {
        out.push_str(line);
    }
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("import os\n");
    for line in &lines[insert_at..] {
        out.push_str(line);
    }
    out
}

#[cfg(test)]
#[path = "patch_tests.rs"]
mod tests;
