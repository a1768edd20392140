//! ragchat CLI entry point.

use anyhow::Result;
use clap::Parser;
use ragchat::cli::{commands, Cli, Commands};
use ragchat::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up HF_API_TOKEN and friends from a local .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("ragchat={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Ensure data directories exist
    std::fs::create_dir_all(settings.data_dir())?;

    // Execute command
    match cli.command {
        Commands::Serve { host, port } => {
            commands::run_serve(host, port, settings).await?;
        }

        Commands::Index => {
            commands::run_index(settings).await?;
        }

        Commands::Ask { query } => {
            commands::run_ask(&query, settings).await?;
        }

        Commands::History { limit } => {
            commands::run_history(limit, settings)?;
        }

        Commands::Evaluate {
            retrieval,
            ground_truth,
        } => {
            commands::run_evaluate(retrieval, ground_truth, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, cli.config.as_deref(), settings)?;
        }
    }

    Ok(())
}
