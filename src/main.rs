//! rednote - publish image/text notes through the creator web editor.
//!
//! Main entry point for the rednote CLI.

mod cli;
mod cmd_browser;
mod cmd_publish;

use std::error::Error;
use std::path::Path;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rednote_config::{
    default_config_path, Config, ConfigError, ConfigLoader, ConfigValidator, LoggingConfig,
};

use crate::cli::{Cli, Commands};

fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn Error>> {
    let log_dir = logging.log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("rednote")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Flushes pending lines on exit; must outlive the subscriber.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => ConfigLoader::load(path),
        None => ConfigLoader::load_or_default(&default_config_path()),
    }
}

/// Reject configurations with errors, logging any warnings.
fn ensure_valid(config: &Config) -> Result<(), ConfigError> {
    let result = ConfigValidator::validate(config);
    for warning in &result.warnings {
        warn!("config: {}", warning);
    }
    if result.is_valid() {
        return Ok(());
    }
    let errors: Vec<String> = result.errors.iter().map(ToString::to_string).collect();
    Err(ConfigError::Invalid(errors.join("; ")))
}

/// Token cancelled on the first Ctrl-C.
fn shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, cancelling");
            child.cancel();
        }
    });
    token
}

fn check_config(path: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let config = load_config(path)?;
    let result = ConfigValidator::validate(&config);

    for warning in &result.warnings {
        println!("warning: {}", warning);
    }
    for error in &result.errors {
        println!("error: {}", error);
    }

    if !result.is_valid() {
        return Err(format!("{} configuration error(s)", result.errors.len()).into());
    }
    println!("Configuration OK");
    Ok(())
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Tokenize { text } => {
            let tokens = rednote_core::tokenize(&text);
            println!("{}", serde_json::to_string_pretty(&tokens)?);
            Ok(())
        }
        Commands::Check => check_config(config_path),
        Commands::Publish(args) => {
            let config = load_config(config_path)?;
            init_tracing(&config.logging)?;
            cmd_publish::handle_publish(args, config, shutdown_token()).await
        }
        Commands::Browser => {
            let config = load_config(config_path)?;
            init_tracing(&config.logging)?;
            ensure_valid(&config)?;
            cmd_browser::handle_browser(config, shutdown_token()).await
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }

    Ok(())
}
