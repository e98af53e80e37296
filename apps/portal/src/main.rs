mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use portal::config::Config;
use portal::state::PortalState;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // job-titles is offline and needs no configuration
    let config = match &cli.command {
        Command::JobTitles { .. } => None,
        _ => Some(Config::from_env()?),
    };
    let rust_log = config.as_ref().map_or("info", |c| c.rust_log.as_str());

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Some(config) = config else {
        if let Command::JobTitles { query } = &cli.command {
            commands::run_job_titles(query);
        }
        return Ok(());
    };

    info!("Starting portal client v{}", env!("CARGO_PKG_VERSION"));
    let state = PortalState::from_config(&config).await?;

    match cli.command {
        Command::Browse(args) => commands::run_browse(&state, args).await,
        Command::Comments(args) => commands::run_comments(&state, args).await,
        Command::Contribute(args) => commands::run_contribute(&state, args).await,
        Command::SubmitResume(args) => commands::run_submit_resume(&state, args).await,
        Command::JobTitles { query } => {
            commands::run_job_titles(&query);
            Ok(())
        }
    }
}
