//! `SportSeeClient` trait, error types and the per-user data pipeline.
//!
//! The pipeline is: a [`SportSeeClient`] provider answers four per-user
//! reads, [`fetch::fetch_user_bundle`] runs them concurrently, and
//! [`model::NormalizedUserRecord::from_bundle`] turns the raw payloads into
//! the canonical record consumed by the dashboard.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config;
pub mod dashboard;
pub mod fetch;
pub mod fixtures;
pub mod http_client;
pub mod loader;
pub mod model;
pub mod types;

use crate::types::{
    RawActivityPayload, RawAverageSessionsPayload, RawPerformancePayload, RawUserPayload,
};

#[derive(Debug, Error)]
pub enum SportSeeError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl SportSeeError {
    /// HTTP status code of the failed response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            SportSeeError::Status { status, .. } => Some(*status),
            SportSeeError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Numeric user identifier as used in the `/user/{id}` resource paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = SportSeeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(UserId)
            .map_err(|_| SportSeeError::NotFound(format!("invalid user id {s:?}")))
    }
}

impl From<u32> for UserId {
    fn from(id: u32) -> Self {
        UserId(id)
    }
}

/// The four per-user resources served by the SportSee API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Profile,
    Activity,
    AverageSessions,
    Performance,
}

impl Endpoint {
    /// Name used in logs and metric labels.
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Profile => "profile",
            Endpoint::Activity => "activity",
            Endpoint::AverageSessions => "average-sessions",
            Endpoint::Performance => "performance",
        }
    }

    /// Resource path relative to the API root.
    pub fn path(self, user_id: UserId) -> String {
        match self {
            Endpoint::Profile => format!("/user/{user_id}"),
            Endpoint::Activity => format!("/user/{user_id}/activity"),
            Endpoint::AverageSessions => format!("/user/{user_id}/average-sessions"),
            Endpoint::Performance => format!("/user/{user_id}/performance"),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source of raw per-user payloads.
///
/// [`http_client::ReqwestSportSeeClient`] talks to the live API and
/// [`fixtures::FixtureSportSeeClient`] serves in-memory demo data; both are
/// interchangeable behind `Arc<dyn SportSeeClient>`.
#[async_trait]
pub trait SportSeeClient: Send + Sync + 'static {
    async fn get_user(&self, user_id: UserId) -> Result<RawUserPayload, SportSeeError>;
    async fn get_activity(&self, user_id: UserId) -> Result<RawActivityPayload, SportSeeError>;
    async fn get_average_sessions(
        &self,
        user_id: UserId,
    ) -> Result<RawAverageSessionsPayload, SportSeeError>;
    async fn get_performance(
        &self,
        user_id: UserId,
    ) -> Result<RawPerformancePayload, SportSeeError>;
}
