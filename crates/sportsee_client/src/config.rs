use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::fixtures::FixtureSportSeeClient;
use crate::http_client::ReqwestSportSeeClient;
use crate::{SportSeeClient, SportSeeError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Where user payloads come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataSource {
    Http,
    Fixtures,
}

impl FromStr for DataSource {
    type Err = SportSeeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" | "api" => Ok(DataSource::Http),
            "fixtures" | "mock" => Ok(DataSource::Fixtures),
            other => Err(SportSeeError::Config(format!(
                "SPORTSEE_DATA_SOURCE must be \"http\" or \"fixtures\", got {other:?}"
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: String,
    pub data_source: DataSource,
    pub request_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            data_source: DataSource::Http,
            request_timeout: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, SportSeeError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function instead of the process environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, SportSeeError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let base_url = get("SPORTSEE_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        if base_url.trim().is_empty() {
            return Err(SportSeeError::Config("SPORTSEE_BASE_URL is empty".into()));
        }
        let data_source = get("SPORTSEE_DATA_SOURCE")
            .map(|s| s.parse::<DataSource>())
            .transpose()?
            .unwrap_or(DataSource::Http);
        let request_timeout = get("SPORTSEE_REQUEST_TIMEOUT_SECS")
            .map(|s| parse_secs("SPORTSEE_REQUEST_TIMEOUT_SECS", &s))
            .transpose()?;
        Ok(Self {
            base_url,
            data_source,
            request_timeout,
        })
    }

    /// Build the provider selected by [`Config::data_source`].
    pub fn build_client(&self) -> Result<Arc<dyn SportSeeClient>, SportSeeError> {
        let client: Arc<dyn SportSeeClient> = match self.data_source {
            DataSource::Http => Arc::new(ReqwestSportSeeClient::with_timeout(
                &self.base_url,
                self.request_timeout,
            )?),
            DataSource::Fixtures => Arc::new(FixtureSportSeeClient::demo()),
        };
        Ok(client)
    }
}

/// Parse a positive whole number of seconds.
pub fn parse_secs(name: &str, value: &str) -> Result<Duration, SportSeeError> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(SportSeeError::Config(format!("{name} must be greater than 0"))),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(_) => Err(SportSeeError::Config(format!(
            "{name} must be a whole number of seconds, got {value:?}"
        ))),
    }
}
