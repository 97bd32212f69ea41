//! Action subcommand handlers: list, run, generate, translate.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

use bykilt_catalog::ActionCatalog;
use bykilt_codegen::{BrowserControlGenerator, CommandTranslator};
use bykilt_config::Config;
use bykilt_core::{DispatchRequest, Dispatcher};
use bykilt_protocols::{ActionDefinition, ActionKind, ParamsMap};

/// Options for `bykilt run`.
pub(crate) struct RunOptions {
    pub params: Vec<(String, String)>,
    pub headless: bool,
    pub browser: Option<String>,
    pub recording_path: Option<String>,
    pub timeout: Option<u64>,
    pub json: bool,
}

fn lookup<'a>(
    catalog: &'a ActionCatalog,
    name: &str,
) -> Result<&'a ActionDefinition, Box<dyn std::error::Error>> {
    catalog.get(name).ok_or_else(|| {
        format!(
            "Action '{}' not found. Available actions: {}",
            name,
            catalog.names().join(", ")
        )
        .into()
    })
}

/// Merge `-p` pairs with the defaults the action declares.
pub(crate) fn resolve_params(
    action: &ActionDefinition,
    pairs: Vec<(String, String)>,
) -> Result<ParamsMap, String> {
    let mut params: ParamsMap = pairs.into_iter().collect();

    let mut missing = Vec::new();
    for declared in &action.params {
        if params.get(&declared.name).is_some() {
            continue;
        }
        match &declared.default {
            Some(default) => {
                params.insert(declared.name.clone(), default.clone());
            }
            None if declared.required => missing.push(declared.name.as_str()),
            None => {}
        }
    }

    if !missing.is_empty() {
        return Err(format!(
            "Action '{}' requires parameter(s): {}",
            action.name,
            missing.join(", ")
        ));
    }
    Ok(params)
}

pub(crate) fn handle_list(
    catalog: &ActionCatalog,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(catalog.actions())?);
        }
        _ => {
            if catalog.is_empty() {
                println!("No actions found.");
                return Ok(());
            }
            println!("{:<30} {:<24} {}", "NAME", "TYPE", "DESCRIPTION");
            println!("{}", "-".repeat(80));
            for action in catalog.actions() {
                let kind = match action.kind() {
                    Ok(kind) => kind.as_str().to_string(),
                    Err(_) => format!("{} (unsupported)", action.action_type),
                };
                println!(
                    "{:<30} {:<24} {}",
                    action.display_name(),
                    kind,
                    action.description.as_deref().unwrap_or("")
                );
            }
            println!("\nTotal: {} action(s)", catalog.len());
        }
    }
    Ok(())
}

/// Returns whether the action succeeded.
pub(crate) async fn handle_run(
    config: Config,
    work_dir: PathBuf,
    catalog: ActionCatalog,
    name: &str,
    options: RunOptions,
) -> Result<bool, Box<dyn std::error::Error>> {
    let action = lookup(&catalog, name)?.clone();
    let params = resolve_params(&action, options.params)?;

    let request = DispatchRequest::new(action)
        .with_params(params)
        .with_headless(options.headless)
        .with_browser(options.browser)
        .with_recording_path(options.recording_path)
        .with_timeout(options.timeout.map(Duration::from_secs));

    let dispatcher = Dispatcher::new(config, work_dir, catalog);
    let result = dispatcher.dispatch(request).await;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.message());
        if let Some(path) = result.path() {
            println!("Path: {}", path.display());
        }
    }

    if result.is_success() {
        info!("Action '{}' finished", name);
    } else {
        warn!("Action '{}' failed", name);
    }
    Ok(result.is_success())
}

pub(crate) fn handle_generate(
    catalog: &ActionCatalog,
    name: &str,
    params: Vec<(String, String)>,
    headless: bool,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let action = lookup(catalog, name)?;
    if action.kind()? != ActionKind::BrowserControl {
        return Err(format!(
            "Action '{}' is of type '{}'; only browser-control actions generate scripts",
            name, action.action_type
        )
        .into());
    }

    let params = resolve_params(action, params)?;
    let script = BrowserControlGenerator::new()
        .with_slowmo(action.slowmo)
        .generate(action.require_flow()?, &params, headless)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, script)?;
            println!("Wrote {}", path.display());
        }
        None => print!("{}", script),
    }
    Ok(())
}

pub(crate) fn handle_translate(
    catalog: &ActionCatalog,
    name: &str,
    params: Vec<(String, String)>,
    maintain_session: bool,
    tab_strategy: &str,
    output_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let action = lookup(catalog, name)?;
    let params = resolve_params(action, params)?;
    let path = CommandTranslator::translate_action(
        action,
        &params,
        maintain_session,
        tab_strategy,
        output_dir,
    )?;
    println!("Wrote {}", path.display());
    Ok(())
}
