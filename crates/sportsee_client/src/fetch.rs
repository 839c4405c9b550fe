//! Concurrent fan-out over the four per-user endpoints.
//!
//! All four reads are started together and every result is inspected once
//! they have all settled, so a failure report lists each endpoint that
//! failed rather than only the first one.

use std::fmt;
use std::time::Instant;

use thiserror::Error;
use tracing::warn;

use crate::types::RawUserBundle;
use crate::{Endpoint, SportSeeClient, SportSeeError, UserId};

/// One endpoint's failure inside a [`FetchError`].
#[derive(Debug)]
pub struct EndpointFailure {
    pub endpoint: Endpoint,
    pub error: SportSeeError,
}

impl fmt::Display for EndpointFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error.status() {
            Some(status) => write!(
                f,
                "request for {} failed with status {status}",
                self.endpoint
            ),
            None => write!(f, "request for {} failed: {}", self.endpoint, self.error),
        }
    }
}

#[derive(Debug, Error)]
#[error("fetching data for user {user_id} failed: {}", describe(.failures))]
pub struct FetchError {
    pub user_id: UserId,
    /// Every endpoint that failed, in request order. Never empty.
    pub failures: Vec<EndpointFailure>,
}

impl FetchError {
    pub fn failed_endpoints(&self) -> Vec<Endpoint> {
        self.failures.iter().map(|f| f.endpoint).collect()
    }
}

fn describe(failures: &[EndpointFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Fetch the profile, activity, average-sessions and performance payloads
/// for `user_id` concurrently.
///
/// Succeeds only when all four reads succeed. Each failed endpoint is logged
/// with its name and status code before the aggregate error is returned.
pub async fn fetch_user_bundle<C>(client: &C, user_id: UserId) -> Result<RawUserBundle, FetchError>
where
    C: SportSeeClient + ?Sized,
{
    let started = Instant::now();
    let (user, activity, average_sessions, performance) = tokio::join!(
        client.get_user(user_id),
        client.get_activity(user_id),
        client.get_average_sessions(user_id),
        client.get_performance(user_id),
    );
    metrics::histogram!("sportsee_fetch_duration_seconds").record(started.elapsed().as_secs_f64());

    let mut failures = Vec::new();
    let user = settle(Endpoint::Profile, user_id, user, &mut failures);
    let activity = settle(Endpoint::Activity, user_id, activity, &mut failures);
    let average_sessions = settle(
        Endpoint::AverageSessions,
        user_id,
        average_sessions,
        &mut failures,
    );
    let performance = settle(Endpoint::Performance, user_id, performance, &mut failures);

    match (user, activity, average_sessions, performance) {
        (Some(user), Some(activity), Some(average_sessions), Some(performance)) => {
            Ok(RawUserBundle {
                user,
                activity,
                average_sessions,
                performance,
            })
        }
        _ => Err(FetchError { user_id, failures }),
    }
}

fn settle<T>(
    endpoint: Endpoint,
    user_id: UserId,
    result: Result<T, SportSeeError>,
    failures: &mut Vec<EndpointFailure>,
) -> Option<T> {
    match result {
        Ok(payload) => Some(payload),
        Err(error) => {
            warn!(
                endpoint = endpoint.name(),
                status = error.status(),
                %user_id,
                %error,
                "request for {} failed",
                endpoint.name()
            );
            metrics::counter!("sportsee_fetch_failures_total", "endpoint" => endpoint.name())
                .increment(1);
            failures.push(EndpointFailure { endpoint, error });
            None
        }
    }
}
