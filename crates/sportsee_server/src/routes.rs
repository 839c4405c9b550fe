use std::sync::Arc;
use std::time::Duration;

use axum::debug_handler;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::get,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sportsee_client::dashboard::DashboardView;
use sportsee_client::loader::load_user_record;
use sportsee_client::model::NormalizedUserRecord;
use sportsee_client::{SportSeeClient, UserId};
use tower_http::trace::TraceLayer;

use crate::error::{ApiError, ApiResult};

pub struct AppState {
    pub client: Arc<dyn SportSeeClient>,
    /// `None` when no Prometheus recorder is installed; `/metrics` then 404s.
    pub metrics: Option<PrometheusHandle>,
    /// Upper bound on fetching and normalizing one user.
    pub load_timeout: Duration,
}

impl AppState {
    pub fn new(client: Arc<dyn SportSeeClient>, load_timeout: Duration) -> Self {
        Self {
            client,
            metrics: None,
            load_timeout,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_endpoint))
        .route("/user/{id}", get(get_user_record))
        .route("/user/{id}/dashboard", get(get_user_dashboard))
        .fallback(no_route)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[debug_handler]
async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

#[debug_handler]
async fn metrics_endpoint(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => ApiError::NoRoute("/metrics".into()).into_response(),
    }
}

#[debug_handler]
async fn get_user_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<NormalizedUserRecord>> {
    load(&state, &id).await.map(Json)
}

#[debug_handler]
async fn get_user_dashboard(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<DashboardView>> {
    let record = load(&state, &id).await?;
    Ok(Json(DashboardView::from_record(&record)))
}

async fn no_route(uri: Uri) -> ApiError {
    ApiError::NoRoute(uri.path().to_string())
}

async fn load(state: &AppState, raw_id: &str) -> ApiResult<NormalizedUserRecord> {
    let user_id: UserId = raw_id
        .parse()
        .map_err(|_| ApiError::InvalidUserId(raw_id.to_string()))?;
    match tokio::time::timeout(
        state.load_timeout,
        load_user_record(state.client.as_ref(), user_id),
    )
    .await
    {
        Ok(result) => Ok(result?),
        Err(_) => Err(ApiError::Timeout(user_id)),
    }
}
