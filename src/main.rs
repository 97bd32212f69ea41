//! Bykilt - catalogued browser automation dispatch
//!
//! Entry point for the `bykilt` CLI.

mod cli;
mod cmd_action;
mod cmd_validate;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use clap::Parser;
use tracing::{debug, error};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bykilt_catalog::ActionCatalog;
use bykilt_config::{resolve_against, Config, ConfigLoader};

use cli::{Cli, Commands};

/// Keeps the file writer flushing until the process exits.
static GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn init_tracing(log_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("bykilt")
        .filename_suffix("log")
        .max_log_files(30)
        .build(log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = GUARD.set(guard);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Console output goes to stderr so `list --format json` stays parseable.
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Resolve the config file. A missing file at the default location falls back
/// to the per-user config, then to built-in defaults.
fn load_config(cli: &Cli, work_dir: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    let path = if cli.config.is_absolute() {
        cli.config.clone()
    } else {
        work_dir.join(&cli.config)
    };

    if !path.exists() {
        if let Some(user_path) = ConfigLoader::user_config_path().filter(|p| p.exists()) {
            return Ok(ConfigLoader::load(&user_path)?);
        }
    }
    Ok(ConfigLoader::load_or_default(&path)?)
}

fn catalog_path(cli: &Cli, config: &Config, work_dir: &Path) -> PathBuf {
    match &cli.catalog {
        Some(path) => resolve_against(work_dir, &path.to_string_lossy()),
        None => config.paths.catalog_path(work_dir),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let work_dir = match &cli.work_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let config = load_config(&cli, &work_dir)?;
    init_tracing(&config.paths.logs_dir(&work_dir))?;
    debug!("Working directory: {}", work_dir.display());

    let catalog_path = catalog_path(&cli, &config, &work_dir);

    match cli.command {
        Commands::List { format } => {
            let catalog = ActionCatalog::load(&catalog_path)?;
            cmd_action::handle_list(&catalog, &format)?;
        }
        Commands::Run {
            action,
            params,
            headless,
            browser,
            recording_path,
            timeout,
            json,
        } => {
            let catalog = ActionCatalog::load(&catalog_path)?;
            let options = cmd_action::RunOptions {
                params,
                headless,
                browser,
                recording_path,
                timeout,
                json,
            };
            let succeeded =
                cmd_action::handle_run(config, work_dir, catalog, &action, options).await?;
            if !succeeded {
                std::process::exit(1);
            }
        }
        Commands::Generate {
            action,
            params,
            headless,
            output,
        } => {
            let catalog = ActionCatalog::load(&catalog_path)?;
            cmd_action::handle_generate(&catalog, &action, params, headless, output.as_deref())?;
        }
        Commands::Translate {
            action,
            params,
            maintain_session,
            tab_strategy,
            output_dir,
        } => {
            let catalog = ActionCatalog::load(&catalog_path)?;
            let output_dir = output_dir.unwrap_or_else(|| config.paths.scripts_dir(&work_dir));
            let tab_strategy = tab_strategy.unwrap_or_else(|| config.unlock_future.tab_strategy.clone());
            cmd_action::handle_translate(
                &catalog,
                &action,
                params,
                maintain_session || config.unlock_future.maintain_session,
                &tab_strategy,
                &output_dir,
            )?;
        }
        Commands::Validate => {
            if let Err(e) = cmd_validate::handle_validate(&config, &catalog_path) {
                error!("Validation failed: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
