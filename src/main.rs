//! formpilot - heuristic form detection and profile autofill.
//!
//! Main entry point for the formpilot CLI.

mod cli;
mod cmd_fill;
mod cmd_merge;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;
use tracing::warn;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use formpilot_config::{ConfigLoader, ConfigValidator};

use crate::cli::{Cli, Commands};

/// Initialize tracing: human-readable logs on stderr, plus daily rolling
/// JSON files when a log directory is configured.
fn init_tracing(level: &str, log_dir: Option<&Path>) -> Result<()> {
    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("formpilot")
                .filename_suffix("log")
                .max_log_files(14)
                .build(dir)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // The guard flushes buffered lines on drop; keep it for the whole run.
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().json().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(())
}

/// Read and deserialize a JSON file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} from {}", what, path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid {} JSON in {}", what, path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;
    let warnings = ConfigValidator::validate(&config).into_result()?;

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    let log_dir: Option<PathBuf> = cli.log_dir.clone().or_else(|| config.logging.file.clone());
    init_tracing(level, log_dir.as_deref())?;
    for warning in warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }

    match cli.command {
        Commands::Scan {
            html,
            profile,
            format,
            watch,
        } => cmd_fill::handle_scan(&config, &html, profile.as_deref(), format, watch).await,
        Commands::Fill {
            html,
            profile,
            cv,
            detach_once,
            format,
        } => {
            cmd_fill::handle_fill(
                &config,
                &html,
                profile.as_deref(),
                cv.as_deref(),
                detach_once,
                format,
            )
            .await
        }
        Commands::Merge(args) => cmd_merge::handle_merge(&config, args),
        Commands::CheckUpload { html, cv } => cmd_fill::handle_check_upload(&config, &html, &cv),
    }
}
