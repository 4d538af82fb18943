use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use care360::booking::BookingFlow;
use care360::config::{BotConfig, LogFormat};
use care360::supervisor::{supervise, WorkerExit};
use care360::tokens::load_tokens_from_file;
use care360::upstream::HttpClinicApi;
use care360::userdata::UserDirectory;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = BotConfig::from_env().context("Invalid configuration")?;
    init_tracing(config.log_format);

    info!("Starting Care360 clinic bots");

    // Without tokens there is nothing to run
    let identities = load_tokens_from_file(&config.tokens_file).context("Failed to load bot tokens")?;

    // A missing user file only disables profile lookups
    let users = UserDirectory::load(&config.users_file);

    let api = HttpClinicApi::new(&config.api_url, config.upstream_timeout)?;
    let flow = Arc::new(BookingFlow::new(api, users, config.language.as_str()));

    info!(
        identities = identities.len(),
        api_url = %config.api_url,
        timeout_secs = config.upstream_timeout.as_secs(),
        "Launching bot workers"
    );

    let reports = supervise(identities, move |identity| {
        care360::bot::run_identity(identity, Arc::clone(&flow))
    })
    .await;

    for report in &reports {
        if report.exit != WorkerExit::Stopped {
            warn!(identity = %report.identity, exit = ?report.exit, "Bot worker did not stop cleanly");
        }
    }
    info!("All bot workers have ended");

    Ok(())
}
