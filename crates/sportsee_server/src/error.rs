//! Error type for the HTTP surface.
//!
//! Every variant answers `404 Page Not Found`: callers get no hint whether
//! the user is unknown, the upstream API is down, or its payload was
//! malformed. The root cause is logged instead.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sportsee_client::UserId;
use sportsee_client::loader::LoadError;
use thiserror::Error;
use tracing::warn;

pub const NOT_FOUND_BODY: &str = "Page Not Found";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid user id: {0:?}")]
    InvalidUserId(String),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("loading user {0} timed out")]
    Timeout(UserId),

    #[error("no route for {0}")]
    NoRoute(String),
}

impl ApiError {
    /// Short cause label used in logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            ApiError::InvalidUserId(_) => "invalid-id",
            ApiError::Load(e) if e.is_transport() => "upstream",
            ApiError::Load(_) => "malformed",
            ApiError::Timeout(_) => "timeout",
            ApiError::NoRoute(_) => "no-route",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let reason = self.reason();
        warn!(reason, error = %self, "responding not found");
        metrics::counter!("sportsee_not_found_total", "reason" => reason).increment(1);
        (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
    }
}

/// Result type alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_is_a_plain_not_found() {
        let errors = [
            ApiError::InvalidUserId("abc".into()),
            ApiError::Timeout(UserId(12)),
            ApiError::NoRoute("/elsewhere".into()),
        ];
        for err in errors {
            let resp = err.into_response();
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn reasons_are_stable_labels() {
        assert_eq!(ApiError::InvalidUserId("x".into()).reason(), "invalid-id");
        assert_eq!(ApiError::Timeout(UserId(1)).reason(), "timeout");
        assert_eq!(ApiError::NoRoute("/".into()).reason(), "no-route");
    }
}
