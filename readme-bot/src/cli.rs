///
/// This module implements the CLI interface for readme-bot: argument parsing,
/// configuration and event loading, and wiring the real GitHub and Gemini
/// clients into the core pipeline.
///
/// All pipeline logic lives in `readme-bot-core`; this module is CLI glue.
///
/// ## How To Use
/// - In a workflow: run `readme-bot run` on `push`. Secrets arrive as the
///   `gemini_api_key` / `github_token` action inputs, the event through the
///   standard `GITHUB_*` variables.
/// - Programmatically: call [`run`] with a constructed [`Cli`].
use crate::gemini::{GeminiClient, DEFAULT_GEMINI_API_URL};
use crate::github::{GitHubClient, DEFAULT_GITHUB_API_URL};
use crate::load_config::load_config;
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use readme_bot_core::event::{TriggerEvent, PUSH_EVENT};
use readme_bot_core::synchronise::synchronise;
use std::path::{Path, PathBuf};

/// CLI for readme-bot: keep the README in step with pushed code.
#[derive(Parser)]
#[clap(
    name = "readme-bot",
    version,
    about = "Rewrite the README from a push's diff using Gemini, and commit it through the GitHub API"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process the current workflow event
    Run(RunArgs),
}

#[derive(Args, Clone)]
pub struct RunArgs {
    /// Gemini API key
    #[clap(long, env = "INPUT_GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// GitHub token with contents write access
    #[clap(long, env = "INPUT_GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Event class that triggered the run (only `push` does anything)
    #[clap(long, env = "GITHUB_EVENT_NAME")]
    pub event_name: Option<String>,

    /// Path to the JSON event payload
    #[clap(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// `owner/repo`, used when the payload has no repository object
    #[clap(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Optional YAML settings file
    #[clap(long)]
    pub config: Option<PathBuf>,

    #[clap(long, env = "GITHUB_API_URL", default_value = DEFAULT_GITHUB_API_URL)]
    pub github_api_url: String,

    #[clap(long, env = "GEMINI_API_URL", default_value = DEFAULT_GEMINI_API_URL)]
    pub gemini_api_url: String,
}

pub const MISSING_EVENT_NAME_MESSAGE: &str =
    "No trigger event name: set GITHUB_EVENT_NAME or pass --event-name.";

/// Read the trigger event. The payload file is only read for pushes.
pub fn load_event(
    event_name: &str,
    event_path: Option<&Path>,
    repository: Option<&str>,
) -> Result<TriggerEvent> {
    let payload = match (event_name == PUSH_EVENT, event_path) {
        (true, Some(path)) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read event payload {:?}", path))?,
        ),
        _ => None,
    };
    let event = TriggerEvent::new(event_name, payload.as_deref(), repository)?;
    tracing::info!(event_name = event.event_name(), "Trigger event loaded");
    Ok(event)
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Run(args) => run_update(args).await,
    }
}

async fn run_update(args: RunArgs) -> Result<()> {
    let config = load_config(
        args.config.as_deref(),
        args.gemini_api_key,
        args.github_token,
    )?;
    config.update.trace_loaded();

    let Some(event_name) = args.event_name.filter(|n| !n.trim().is_empty()) else {
        tracing::error!("No event name given");
        bail!(MISSING_EVENT_NAME_MESSAGE);
    };
    let event = load_event(
        &event_name,
        args.event_path.as_deref(),
        args.repository.as_deref(),
    )?;

    let host = GitHubClient::new(&args.github_api_url, &config.secrets.github_token)
        .map_err(anyhow::Error::msg)?;
    let generator = GeminiClient::new(
        &args.gemini_api_url,
        &config.model,
        &config.secrets.gemini_api_key,
    )
    .map_err(anyhow::Error::msg)?;

    tracing::info!(command = "run", "Starting README synchronisation");
    match synchronise(&config.update, &event, &host, &generator).await {
        Ok(report) => {
            tracing::info!(command = "run", ?report, "Synchronisation complete");
            Ok(())
        }
        Err(e) => {
            tracing::error!(command = "run", error = %e, "Synchronisation failed");
            Err(anyhow::Error::msg(e))
        }
    }
}
