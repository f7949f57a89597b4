//! taskqueue - command-line client for the hosted task queue.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use taskqueue_client::QueueClient;
use taskqueue_config::{ConfigLoader, LoggingConfig};

use cli::{Cli, Commands};

/// Initialize tracing with console output, plus a daily log file when
/// `[logging] dir` is set.
fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match logging.dir_path() {
        Some(log_dir) => {
            std::fs::create_dir_all(&log_dir)?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("taskqueue")
                .filename_suffix("log")
                .max_log_files(30)
                .build(&log_dir)?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            // Flushes buffered lines on exit.
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::load_or_default(cli.config.as_deref())?;
    init_tracing(&config.logging)?;

    if let Some(queue) = cli.queue {
        config.queue.name = queue;
    }

    let mut client = match QueueClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to create client");
            return Err(e.into());
        }
    };

    let result = match cli.command {
        Commands::Push(args) => commands::push(&mut client, args).await,
        Commands::Curlen => commands::curlen(&mut client).await,
        Commands::Leftlen => commands::leftlen(&mut client).await,
    };

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            error!(code = e.code(), error = %e, "Task queue operation failed");
            eprintln!("errno: {}\nerrmsg: {}", e.code(), e);
            Ok(ExitCode::FAILURE)
        }
    }
}
