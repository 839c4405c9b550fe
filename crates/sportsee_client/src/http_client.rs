//! HTTP client implementation for the SportSee API.
//!
//! This module provides a reqwest-based implementation of the [`SportSeeClient`](crate::SportSeeClient) trait.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::types::{
    Envelope, RawActivityPayload, RawAverageSessionsPayload, RawPerformancePayload, RawUserPayload,
};
use crate::{Endpoint, SportSeeClient, SportSeeError, UserId};

/// Client for the SportSee API using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestSportSeeClient {
    base_url: String,
    client: reqwest::Client,
}

impl ReqwestSportSeeClient {
    /// Create a client rooted at `base_url` (e.g. "http://localhost:3000").
    pub fn new(base_url: &str) -> Result<Self, SportSeeError> {
        Self::with_timeout(base_url, None)
    }

    /// Create a client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, SportSeeError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: Endpoint, user_id: UserId) -> String {
        format!("{}{}", self.base_url, endpoint.path(user_id))
    }

    /// GET one resource and unwrap its `{"data": ...}` envelope.
    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        user_id: UserId,
    ) -> Result<T, SportSeeError> {
        let url = self.url(endpoint, user_id);
        debug!(%url, endpoint = endpoint.name(), "GET");
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }
        let bytes = resp.bytes().await?;
        let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
        Ok(envelope.data)
    }
}

/// Extract error information from a failed response.
async fn error_from_response(resp: reqwest::Response) -> SportSeeError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    let body: String = body.chars().take(256).collect();
    SportSeeError::Status { status, body }
}

#[async_trait]
impl SportSeeClient for ReqwestSportSeeClient {
    async fn get_user(&self, user_id: UserId) -> Result<RawUserPayload, SportSeeError> {
        self.fetch(Endpoint::Profile, user_id).await
    }

    async fn get_activity(&self, user_id: UserId) -> Result<RawActivityPayload, SportSeeError> {
        self.fetch(Endpoint::Activity, user_id).await
    }

    async fn get_average_sessions(
        &self,
        user_id: UserId,
    ) -> Result<RawAverageSessionsPayload, SportSeeError> {
        self.fetch(Endpoint::AverageSessions, user_id).await
    }

    async fn get_performance(
        &self,
        user_id: UserId,
    ) -> Result<RawPerformancePayload, SportSeeError> {
        self.fetch(Endpoint::Performance, user_id).await
    }
}
