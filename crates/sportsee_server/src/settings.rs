use std::net::SocketAddr;
use std::time::Duration;

use sportsee_client::SportSeeError;
use sportsee_client::config::{Config, parse_secs};

pub const DEFAULT_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Server settings, wrapping the client [`Config`].
#[derive(Clone, Debug)]
pub struct Settings {
    pub address: SocketAddr,
    pub load_timeout: Duration,
    pub client: Config,
}

impl Settings {
    pub fn from_env() -> Result<Self, SportSeeError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    pub fn from_env_with<F>(mut get: F) -> Result<Self, SportSeeError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let raw_address = get("ADDRESS").unwrap_or_else(|| DEFAULT_ADDRESS.into());
        let address = raw_address.trim().parse::<SocketAddr>().map_err(|_| {
            SportSeeError::Config(format!("ADDRESS is not a socket address: {raw_address:?}"))
        })?;
        let load_timeout = get("SPORTSEE_HANDLER_TIMEOUT_SECS")
            .map(|s| parse_secs("SPORTSEE_HANDLER_TIMEOUT_SECS", &s))
            .transpose()?
            .unwrap_or(DEFAULT_LOAD_TIMEOUT);
        let client = Config::from_env_with(&mut get)?;
        Ok(Self {
            address,
            load_timeout,
            client,
        })
    }
}
