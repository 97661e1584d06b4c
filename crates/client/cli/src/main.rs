//! Parry replay and telemetry tool.
//!
//! Run with: `parry-sim <command>`
mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Replay, SettingsCommand, Timings};
use parry_runtime::RuntimeConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Replay parry scenarios and inspect timing telemetry
#[derive(Parser)]
#[command(name = "parry-sim")]
#[command(about = "Parry timing simulator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Replay a scenario file through the engine
    Replay(Replay),

    /// Summarize the timing log
    Timings(Timings),

    /// Show or initialize persisted settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = setup_logging()?;

    let config = RuntimeConfig::from_env();

    match cli.command {
        Command::Replay(cmd) => cmd.execute(&config).await,
        Command::Timings(cmd) => cmd.execute(&config),
        Command::Settings(cmd) => cmd.execute(&config),
    }
}

/// Setup logging to stderr, plus a log file when `PARRY_LOG_DIR` is set.
///
/// The returned guard must live until exit so buffered file lines are written.
fn setup_logging() -> Result<Option<WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match std::env::var_os("PARRY_LOG_DIR") {
        Some(log_dir) => {
            std::fs::create_dir_all(&log_dir)?;
            let file_appender = tracing_appender::rolling::never(&log_dir, "parry-sim.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}
