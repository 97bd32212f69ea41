//! CLI definitions for Bykilt.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Bykilt CLI.
#[derive(Parser)]
#[command(name = "bykilt")]
#[command(about = "Run catalogued browser automation actions")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (missing file means defaults)
    #[arg(
        short,
        long,
        default_value = "config/bykilt.toml",
        env = "BYKILT_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Working directory
    #[arg(short, long, global = true)]
    pub work_dir: Option<PathBuf>,

    /// Action catalog (overrides `paths.catalog`)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List catalogued actions
    List {
        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Run an action
    Run {
        /// Action name
        action: String,

        /// Parameter as KEY=VALUE (repeatable)
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// Run the browser headless
        #[arg(long)]
        headless: bool,

        /// Browser type (chrome, edge, chromium, firefox, webkit)
        #[arg(long)]
        browser: Option<String>,

        /// Directory for video recordings
        #[arg(long)]
        recording_path: Option<String>,

        /// Timeout in seconds (overrides `execution.timeout_seconds`; 0 disables it)
        #[arg(long)]
        timeout: Option<u64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the generated script of a browser-control action
    Generate {
        /// Action name
        action: String,

        /// Parameter as KEY=VALUE (repeatable)
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// Generate a headless script
        #[arg(long)]
        headless: bool,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the JSON command file of an action
    Translate {
        /// Action name
        action: String,

        /// Parameter as KEY=VALUE (repeatable)
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// Keep the browser tab open after replay
        #[arg(long)]
        maintain_session: bool,

        /// Tab selection strategy (overrides `unlock_future.tab_strategy`)
        #[arg(long)]
        tab_strategy: Option<String>,

        /// Output directory (default: the scripts directory)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Validate the configuration and the action catalog
    Validate,
}

/// Parse `KEY=VALUE`. The value may contain `=`.
pub(crate) fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("query=a=b").unwrap(),
            ("query".to_string(), "a=b".to_string())
        );
        assert_eq!(parse_param("empty=").unwrap().1, "");
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=x").is_err());
    }

    #[test]
    fn test_run_arguments() {
        let cli = Cli::try_parse_from([
            "bykilt", "run", "search", "-p", "q=rust", "--param", "page=2", "--browser", "edge",
            "--timeout", "30",
        ])
        .unwrap();
        match cli.command {
            Commands::Run {
                action,
                params,
                browser,
                timeout,
                headless,
                ..
            } => {
                assert_eq!(action, "search");
                assert_eq!(params.len(), 2);
                assert_eq!(browser.as_deref(), Some("edge"));
                assert_eq!(timeout, Some(30));
                assert!(!headless);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["bykilt", "list", "--catalog", "other.yaml", "-w", "/tmp"])
            .unwrap();
        assert_eq!(cli.catalog, Some(PathBuf::from("other.yaml")));
        assert_eq!(cli.work_dir, Some(PathBuf::from("/tmp")));
    }
}
