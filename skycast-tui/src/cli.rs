use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use skycast_core::{Config, ServiceId, provider_from_config};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "skycast",
    version,
    about = "Terminal weather dashboard",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Start the dashboard with this location instead of detecting one.
    pub location: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store an API key for an external service.
    Configure {
        /// Service short name, "openweather" or "opencage".
        service: String,
    },

    /// Run the dashboard (the default when no subcommand is given).
    Dash {
        /// Start with this location instead of detecting one.
        #[arg(long)]
        location: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Some(Command::Configure { service }) => configure(&service),
            Some(Command::Dash { location }) => dashboard(location).await,
            None => dashboard(self.location).await,
        }
    }
}

fn configure(service: &str) -> Result<()> {
    let id = ServiceId::try_from(service)?;
    let mut config = Config::load()?;

    let api_key = inquire::Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        return Err(anyhow!("API key must not be empty"));
    }

    config.upsert_service_api_key(id, api_key.trim().to_string());
    config.save()?;

    println!("Saved API key for {id} to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn dashboard(location: Option<String>) -> Result<()> {
    // Keep the appender guard alive for the whole session.
    let _guard = init_logging()?;

    let config = Config::load()?;
    let provider = provider_from_config(&config)?;
    let geocode_key = config.service_api_key(ServiceId::OpenCage).map(str::to_owned);

    if geocode_key.is_none() {
        tracing::info!(
            "No opencage API key configured; skipping location detection \
             (run `skycast configure opencage` to enable it)"
        );
    }

    App::new(Arc::from(provider), geocode_key, location).run().await
}

/// Log to a file under the platform data dir; the terminal belongs to the
/// dashboard while it runs.
fn init_logging() -> Result<WorkerGuard> {
    let dirs = ProjectDirs::from("dev", "skycast", "skycast")
        .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;
    let log_dir = dirs.data_local_dir().join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::never(&log_dir, "skycast.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}
