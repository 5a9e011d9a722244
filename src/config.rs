use std::env;

use thiserror::Error;
use watchparty_collab::Config;
use watchparty_server::ServerConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Everything that can be configured through the environment
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub collab: Config,
    pub server: ServerConfig,
    pub verbose: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(value) = lookup("WATCHPARTY_SERVER_PORT") {
            settings.server.port = value.parse().map_err(|_| ConfigError::Invalid {
                name: "WATCHPARTY_SERVER_PORT",
                expected: "a port number",
                value,
            })?;
        }

        if let Some(value) = lookup("WATCHPARTY_STATIC_DIR") {
            settings.server.static_dir = value.into();
        }

        if let Some(value) = lookup("WATCHPARTY_ANNOUNCE_DEPARTURES") {
            settings.collab.announce_departures = parse_flag("WATCHPARTY_ANNOUNCE_DEPARTURES", value)?;
        }

        if let Some(value) = lookup("WATCHPARTY_VERBOSE") {
            settings.verbose = parse_flag("WATCHPARTY_VERBOSE", value)?;
        }

        Ok(settings)
    }
}

fn parse_flag(name: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            expected: "true or false",
            value,
        }),
    }
}
