//! Browser-control script generator.
//!
//! Compiles a flow into a self-contained pytest module that drives Playwright's
//! sync API. Browser selection, recording and launch options are read from the
//! environment when the test runs; `headless` and the slow-motion delay are
//! baked into the text.

use serde::Serialize;
use serde_json::Value;

use bykilt_protocols::{FlowStep, ParamsMap};

use crate::error::CodegenError;
use crate::python::{py_bool, py_literal, py_str};
use crate::template::substitute_value;

/// Name of the generated test function.
pub const TEST_FUNCTION: &str = "test_browser_control";

/// Default `extract_content` output file.
pub const DEFAULT_EXTRACT_FILE: &str = "extracted_content.json";

const PRELUDE: &str = include_str!("browser_control_prelude.py");

const PYTEST_INI: &str = "\
[pytest]
python_files = *.py
python_functions = test_*
log_cli = true
log_cli_level = INFO
";

const GOTO_WAITS: &[&str] = &["load", "domcontentloaded", "networkidle", "commit"];
const LOAD_STATES: &[&str] = &["load", "domcontentloaded", "networkidle"];
const SELECTOR_STATES: &[&str] = &["attached", "detached", "visible", "hidden"];
const EXTRACT_FIELDS: &[&str] = &["text", "html", "value"];

/// One validated flow step.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserStep {
    Navigate {
        url: String,
        wait_until: String,
        timeout_ms: Option<u64>,
    },
    Click {
        selector: String,
        timeout_ms: Option<u64>,
    },
    Fill {
        selector: String,
        value: String,
    },
    KeyboardPress {
        key: String,
        selector: Option<String>,
    },
    WaitForSelector {
        selector: String,
        state: Option<String>,
        timeout_ms: Option<u64>,
    },
    ScrollToBottom,
    WaitForNavigation {
        wait_until: String,
        timeout_ms: Option<u64>,
    },
    ExtractContent {
        targets: Vec<ExtractTarget>,
        output_file: String,
        mode: OutputMode,
    },
}

impl BrowserStep {
    /// The `action` name this step was parsed from.
    pub fn action(&self) -> &'static str {
        match self {
            BrowserStep::Navigate { .. } => "navigate",
            BrowserStep::Click { .. } => "click",
            BrowserStep::Fill { .. } => "fill",
            BrowserStep::KeyboardPress { .. } => "keyboard_press",
            BrowserStep::WaitForSelector { .. } => "wait_for_selector",
            BrowserStep::ScrollToBottom => "scroll_to_bottom",
            BrowserStep::WaitForNavigation { .. } => "wait_for_navigation",
            BrowserStep::ExtractContent { .. } => "extract_content",
        }
    }

    /// Validate a step whose params have already been substituted.
    pub fn parse(index: usize, step: &FlowStep) -> Result<Self, CodegenError> {
        let fields = StepFields { index, step };
        let parsed = match step.action.trim() {
            "navigate" => BrowserStep::Navigate {
                url: fields.required("url")?,
                wait_until: fields.choice("wait_until", "domcontentloaded", GOTO_WAITS)?,
                timeout_ms: fields.optional_u64("timeout")?,
            },
            "click" => BrowserStep::Click {
                selector: fields.required("selector")?,
                timeout_ms: fields.optional_u64("timeout")?,
            },
            "fill" => BrowserStep::Fill {
                selector: fields.required("selector")?,
                value: match fields.optional("value")? {
                    Some(value) => value,
                    None => fields.optional("text")?.ok_or_else(|| fields.missing("value"))?,
                },
            },
            "keyboard_press" => BrowserStep::KeyboardPress {
                key: fields.required("key")?,
                selector: fields.optional("selector")?,
            },
            "wait_for_selector" => BrowserStep::WaitForSelector {
                selector: fields.required("selector")?,
                state: match fields.optional("state")? {
                    Some(_) => Some(fields.choice("state", "visible", SELECTOR_STATES)?),
                    None => None,
                },
                timeout_ms: fields.optional_u64("timeout")?,
            },
            "scroll_to_bottom" => BrowserStep::ScrollToBottom,
            "wait_for_navigation" => BrowserStep::WaitForNavigation {
                wait_until: fields.choice("wait_until", "load", LOAD_STATES)?,
                timeout_ms: fields.optional_u64("timeout")?,
            },
            "extract_content" => BrowserStep::ExtractContent {
                targets: fields.extract_targets()?,
                output_file: fields
                    .optional("output_file")?
                    .unwrap_or_else(|| DEFAULT_EXTRACT_FILE.to_string()),
                mode: match fields.optional("output_mode")?.as_deref() {
                    Some("overwrite") => OutputMode::Overwrite,
                    _ => OutputMode::Append,
                },
            },
            other => {
                return Err(CodegenError::UnknownAction {
                    index,
                    action: other.to_string(),
                });
            }
        };
        Ok(parsed)
    }

    fn render(&self) -> Result<String, CodegenError> {
        let line = match self {
            BrowserStep::Navigate {
                url,
                wait_until,
                timeout_ms,
            } => format!(
                "page.goto({}, wait_until={}{})",
                py_str(url),
                py_str(wait_until),
                timeout_kwarg(*timeout_ms)
            ),
            BrowserStep::Click {
                selector,
                timeout_ms,
            } => format!("_click(page, {}{})", py_str(selector), timeout_kwarg(*timeout_ms)),
            BrowserStep::Fill { selector, value } => {
                format!("page.fill({}, {})", py_str(selector), py_str(value))
            }
            BrowserStep::KeyboardPress {
                key,
                selector: Some(selector),
            } => format!("page.press({}, {})", py_str(selector), py_str(key)),
            BrowserStep::KeyboardPress { key, selector: None } => {
                format!("page.keyboard.press({})", py_str(key))
            }
            BrowserStep::WaitForSelector {
                selector,
                state,
                timeout_ms,
            } => {
                let state = state
                    .as_ref()
                    .map(|s| format!(", state={}", py_str(s)))
                    .unwrap_or_default();
                format!(
                    "page.wait_for_selector({}{}{})",
                    py_str(selector),
                    state,
                    timeout_kwarg(*timeout_ms)
                )
            }
            BrowserStep::ScrollToBottom => "_scroll_to_bottom(page)".to_string(),
            BrowserStep::WaitForNavigation {
                wait_until,
                timeout_ms,
            } => format!(
                "page.wait_for_load_state({}{})",
                py_str(wait_until),
                timeout_kwarg(*timeout_ms)
            ),
            BrowserStep::ExtractContent {
                targets,
                output_file,
                mode,
            } => format!(
                "_extract_content(page, {}, {}, overwrite={})",
                py_literal(&serde_json::to_value(targets)?),
                py_str(output_file),
                py_bool(*mode == OutputMode::Overwrite)
            ),
        };
        Ok(line)
    }
}

fn timeout_kwarg(timeout_ms: Option<u64>) -> String {
    timeout_ms
        .map(|t| format!(", timeout={}", t))
        .unwrap_or_default()
}

/// How `extract_content` treats an existing output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Overwrite,
    /// Append after a blank line.
    Append,
}

/// One `extract_content` selector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractTarget {
    pub selector: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub fields: Vec<String>,
    pub attributes: Vec<String>,
}

struct StepFields<'a> {
    index: usize,
    step: &'a FlowStep,
}

impl StepFields<'_> {
    fn missing(&self, field: &str) -> CodegenError {
        CodegenError::MissingField {
            index: self.index,
            action: self.step.action.clone(),
            field: field.to_string(),
        }
    }

    fn invalid(&self, field: &str, message: impl Into<String>) -> CodegenError {
        CodegenError::InvalidField {
            index: self.index,
            field: field.to_string(),
            message: message.into(),
        }
    }

    fn optional(&self, field: &str) -> Result<Option<String>, CodegenError> {
        match self.step.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(_) => Err(self.invalid(field, "expected a string")),
        }
    }

    fn required(&self, field: &str) -> Result<String, CodegenError> {
        match self.optional(field)? {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(self.missing(field)),
        }
    }

    fn optional_u64(&self, field: &str) -> Result<Option<u64>, CodegenError> {
        match self.step.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_u64()
                .map(Some)
                .ok_or_else(|| self.invalid(field, "expected a non-negative integer")),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| self.invalid(field, format!("'{}' is not an integer", s))),
            Some(_) => Err(self.invalid(field, "expected an integer")),
        }
    }

    fn choice(&self, field: &str, default: &str, allowed: &[&str]) -> Result<String, CodegenError> {
        let value = self.optional(field)?.unwrap_or_else(|| default.to_string());
        if allowed.contains(&value.as_str()) {
            Ok(value)
        } else {
            Err(self.invalid(
                field,
                format!("'{}' is not one of {}", value, allowed.join(", ")),
            ))
        }
    }

    fn string_list(&self, field: &str, value: Option<&Value>) -> Result<Vec<String>, CodegenError> {
        match value {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::String(s)) => Ok(vec![s.clone()]),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| self.invalid(field, "expected a list of strings"))
                })
                .collect(),
            Some(_) => Err(self.invalid(field, "expected a list of strings")),
        }
    }

    fn extract_targets(&self) -> Result<Vec<ExtractTarget>, CodegenError> {
        let items = match self.step.fields.get("selectors") {
            Some(Value::Array(items)) if !items.is_empty() => items,
            Some(Value::String(s)) if !s.trim().is_empty() => {
                return Ok(vec![ExtractTarget {
                    selector: s.clone(),
                    label: None,
                    fields: vec!["text".to_string()],
                    attributes: Vec::new(),
                }]);
            }
            _ => return Err(self.missing("selectors")),
        };

        items
            .iter()
            .map(|item| match item {
                Value::String(selector) => Ok(ExtractTarget {
                    selector: selector.clone(),
                    label: None,
                    fields: vec!["text".to_string()],
                    attributes: Vec::new(),
                }),
                Value::Object(map) => {
                    let selector = map
                        .get("selector")
                        .and_then(Value::as_str)
                        .filter(|s| !s.trim().is_empty())
                        .ok_or_else(|| self.missing("selectors[].selector"))?;
                    let mut fields = self.string_list("fields", map.get("fields"))?;
                    if let Some(bad) = fields.iter().find(|f| !EXTRACT_FIELDS.contains(&f.as_str())) {
                        return Err(self.invalid(
                            "fields",
                            format!("'{}' is not one of {}", bad, EXTRACT_FIELDS.join(", ")),
                        ));
                    }
                    if fields.is_empty() {
                        fields.push("text".to_string());
                    }
                    Ok(ExtractTarget {
                        selector: selector.to_string(),
                        label: map.get("label").and_then(Value::as_str).map(str::to_string),
                        fields,
                        attributes: self.string_list("attributes", map.get("attributes"))?,
                    })
                }
                _ => Err(self.invalid("selectors", "expected a string or a mapping")),
            })
            .collect()
    }
}

/// Generates pytest/Playwright modules from flows.
#[derive(Debug, Clone, Default)]
pub struct BrowserControlGenerator {
    slowmo_ms: Option<u64>,
}

impl BrowserControlGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Playwright `slow_mo` delay baked into the launch options.
    pub fn with_slowmo(mut self, slowmo_ms: Option<u64>) -> Self {
        self.slowmo_ms = slowmo_ms;
        self
    }

    /// Substitute params into every step and validate it.
    pub fn parse_steps(flow: &[FlowStep], params: &ParamsMap) -> Result<Vec<BrowserStep>, CodegenError> {
        flow.iter()
            .enumerate()
            .map(|(index, step)| {
                let substituted = FlowStep {
                    action: step.action.clone(),
                    fields: step
                        .fields
                        .iter()
                        .map(|(k, v)| (k.clone(), substitute_value(v, params)))
                        .collect(),
                };
                BrowserStep::parse(index, &substituted)
            })
            .collect()
    }

    /// Generate the module text. Identical inputs give identical output.
    pub fn generate(
        &self,
        flow: &[FlowStep],
        params: &ParamsMap,
        headless: bool,
    ) -> Result<String, CodegenError> {
        let steps = Self::parse_steps(flow, params)?;

        let mut script = String::with_capacity(PRELUDE.len() + 128 * (steps.len() + 4));
        script.push_str(PRELUDE);
        script.push_str("\n\n");
        script.push_str(&format!("HEADLESS = {}\n", py_bool(headless)));
        script.push_str(&format!("SLOW_MO = {}\n", self.slowmo_ms.unwrap_or(0)));
        script.push_str(&format!("\n\ndef {}(page):\n", TEST_FUNCTION));

        if steps.is_empty() {
            script.push_str("    pass\n");
        }
        for (index, step) in steps.iter().enumerate() {
            script.push_str(&format!("    # step {}: {}\n", index + 1, step.action()));
            script.push_str(&format!("    {}\n", step.render()?));
        }

        Ok(script)
    }

    /// Companion `pytest.ini` written next to the generated module.
    pub fn pytest_ini() -> &'static str {
        PYTEST_INI
    }
}

#[cfg(test)]
#[path = "browser_control_tests.rs"]
mod tests;
