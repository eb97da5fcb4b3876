use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

mod cli;

use cli::handlers::{run_multiple, run_once};
use cli::{Cli, CommandStatus, Mode};
use volley::config::Config;
use volley::dispatch::{Dispatcher, LogSink};
use volley::http::{PostRequest, ReqwestHttpClient};

/// Every request goes here, with an empty body
const TARGET_URL: &str = "https://atomic.incfile.com/fakepost";

fn setup_logging(level: Option<&str>) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("volley")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("volley.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.unwrap_or("info")))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<CommandStatus> {
    info!("Starting application");

    let Some(mode) = cli.mode() else {
        info!("Unrecognized mode: {:?}", cli.mode);
        println!("{}", "You specified a non recognized option!".yellow());
        return Ok(CommandStatus::Invalid);
    };

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
        println!(
            "  retries: {}, backoff: {}ms, batch size: {}, max in flight: {:?}, deadline: {:?}ms",
            config.retry.max_retries,
            config.retry.backoff_ms,
            config.batch.size,
            config.batch.max_in_flight,
            config.batch.deadline_ms
        );
    }

    let client = ReqwestHttpClient::new(&config.http).context("Failed to create HTTP client")?;
    let dispatcher = Dispatcher::new(Arc::new(client), config.retry.policy())
        .with_options(config.batch.options())
        .context("Invalid batch settings")?
        .with_sink(Arc::new(LogSink));

    let request = PostRequest::new(TARGET_URL);

    let status = match mode {
        Mode::Once => run_once(&dispatcher, &request, cli.is_verbose()).await,
        Mode::Multiple => run_multiple(&dispatcher, &request, config.batch.size, cli.is_verbose()).await,
    };

    Ok(status)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging once the configured level is known
    setup_logging(config.log_level.as_deref()).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    let status = run_application(&cli, &config).await.context("Application failed")?;

    Ok(status.into())
}
