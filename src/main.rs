//! KernelPlan - kernel graph compiler and tool binder
//!
//! Main entry point for the KernelPlan CLI.

mod cli;
mod cmd_compose;
mod cmd_plan;
mod retriever;

use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kernelplan_config::{Config, ConfigLoader, ConfigValidator};

use cli::{Cli, Commands};

/// Get the KernelPlan home directory (~/.kernelplan).
fn kernelplan_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".kernelplan"))
        .unwrap_or_else(|| PathBuf::from(".kernelplan"))
}

/// Initialize tracing with console and file output.
///
/// Console output goes to stderr so command output on stdout stays clean.
/// Log files are written to ~/.kernelplan/logs/ with daily rotation.
fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = kernelplan_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("kernelplan")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes the file writer on drop; keep it for the whole run.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Load the configuration file, falling back to defaults, and check it.
fn load_config(path: &std::path::Path) -> Result<Config, Box<dyn std::error::Error>> {
    let config = ConfigLoader::load_or_default(path)?;
    if !path.exists() {
        debug!("No config file at {}, using defaults", path.display());
    }

    let warnings = ConfigValidator::validate(&config).into_result()?;
    for warning in warnings {
        warn!("{}: {}", warning.path, warning.message);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Validate { file } => cmd_plan::validate(&file),
        Commands::Order { file } => cmd_plan::order(&file),
        Commands::Assign { file, output } => cmd_compose::assign(&file, output, &config).await,
        Commands::Compose {
            file,
            output,
            script,
            no_bind,
        } => cmd_compose::compose(&file, output, script, no_bind, &config).await,
        Commands::Go { file, kernel } => cmd_plan::go(&file, kernel.as_deref(), &config),
        Commands::Visualize { file, output } => cmd_plan::visualize(&file, output.as_deref()),
        Commands::Search { query } => cmd_compose::search(&query, &config).await,
    }
}
