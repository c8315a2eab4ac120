use std::sync::Arc;

use colored::Colorize;
use config::{Config, ConfigError};
use log::{error, info, warn};
use spincity_impls::{ClerkIdentity, StripeProcessor};
use spincity_market::{DatabaseError, Market, MemoryDatabase, PgDatabase, SharedDatabase};
use spincity_server::{run_server, ServerContext};
use thiserror::Error;

mod config;
mod logging;

#[derive(Debug, Error)]
enum StartupError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Could not initialize database: {0}")]
    Database(#[from] DatabaseError),

    #[error("Server stopped: {0}")]
    Server(#[from] std::io::Error),
}

impl StartupError {
    fn hint(&self) -> String {
        match self {
            Self::Config(_) => "Check the environment, or the .env file in the working directory.".to_string(),
            Self::Database(_) => "This is a database error. Make sure the Postgres instance in DATABASE_URL is running and reachable, then try again.".to_string(),
            Self::Server(_) => "Make sure SPINCITY_SERVER_PORT is not used by another process.".to_string(),
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config = Config::from_env()?;

    let database: SharedDatabase = match &config.database_url {
        Some(url) => {
            info!("Connecting to database...");
            Arc::new(PgDatabase::new(url).await?)
        }
        None => {
            warn!("DATABASE_URL is not set, nothing will be persisted");
            Arc::new(MemoryDatabase::new())
        }
    };

    let market = Market::new(
        database,
        Arc::new(StripeProcessor::new(config.stripe_secret_key)),
        Arc::new(ClerkIdentity::new(config.clerk_secret_key)),
        config.onboarding,
    );

    info!("Initialized successfully.");

    run_server(ServerContext::new(market, config.storefront), config.port).await?;

    Ok(())
}

#[tokio::main]
async fn main() {
    logging::init_logger();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            warn!("Failed to read .env file: {}", e);
        }
    }

    if let Err(error) = run().await {
        error!("{} Read the error below to troubleshoot the issue.", "spincity failed to start!".bold().red());
        error!("{}", error);
        error!("{}", format!("Hint: {}", error.hint()).dimmed().italic());
    }
}
