use std::sync::Arc;

use colored::Colorize;
use config::{ConfigError, Settings};
use log::{error, info};
use thiserror::Error;
use watchparty_collab::Collab;

mod config;
mod logging;

#[derive(Debug, Error)]
enum WatchPartyError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Server stopped: {0}")]
    Server(#[from] std::io::Error),
}

impl WatchPartyError {
    fn hint(&self) -> String {
        match self {
            WatchPartyError::Config(_) => "Check the WATCHPARTY_* environment variables and try again.".to_string(),
            WatchPartyError::Server(_) => "Make sure the port is not already in use, or pick another one with WATCHPARTY_SERVER_PORT.".to_string(),
        }
    }
}

async fn run(settings: Settings) -> Result<(), WatchPartyError> {
    info!("Starting watchparty...");
    let collab = Arc::new(Collab::new(settings.collab));

    watchparty_server::run_server(collab, settings.server).await?;

    Ok(())
}

#[tokio::main]
async fn main() {
    let settings = Settings::from_env();
    logging::init_logger(settings.as_ref().map(|s| s.verbose).unwrap_or(false));

    let result = match settings {
        Ok(settings) => run(settings).await,
        Err(error) => Err(error.into()),
    };

    if let Err(error) = result {
        error!("{} Read the error below to troubleshoot the issue. If you think this might be a bug, please report it by making a GitHub issue.", "watchparty failed to start!".bold().red());
        error!("{}", error);
        error!("{}", format!("Hint: {}", error.hint()).as_str().dimmed().italic());
    }
}
