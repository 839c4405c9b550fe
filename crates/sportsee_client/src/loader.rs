//! Fetch + normalize in one call, the way a dashboard page loads a user.

use thiserror::Error;
use tracing::{debug, warn};

use crate::fetch::{FetchError, fetch_user_bundle};
use crate::model::{NormalizeError, NormalizedUserRecord};
use crate::{SportSeeClient, UserId};

/// Why a user record could not be loaded.
///
/// Transport and structural failures stay distinct here; presentation
/// boundaries are free to collapse both into a single "not found".
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("normalizing data for user {user_id} failed: {source}")]
    Normalize {
        user_id: UserId,
        #[source]
        source: NormalizeError,
    },
}

impl LoadError {
    /// True when the API could not be reached or answered with an error.
    pub fn is_transport(&self) -> bool {
        matches!(self, LoadError::Fetch(_))
    }
}

pub async fn load_user_record<C>(
    client: &C,
    user_id: UserId,
) -> Result<NormalizedUserRecord, LoadError>
where
    C: SportSeeClient + ?Sized,
{
    let bundle = fetch_user_bundle(client, user_id).await?;
    let record = NormalizedUserRecord::from_bundle(&bundle).map_err(|source| {
        warn!(%user_id, error = %source, "user payloads could not be normalized");
        metrics::counter!("sportsee_normalize_failures_total").increment(1);
        LoadError::Normalize { user_id, source }
    })?;
    debug!(%user_id, "user record loaded");
    Ok(record)
}
