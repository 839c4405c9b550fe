use std::sync::Arc;

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::signal;
use tracing::info;

use sportsee_server::settings::Settings;
use sportsee_server::{AppState, build_app, telemetry};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let log_env = telemetry::log_filter_from_env();
    telemetry::init_tracing(&log_env);
    info!(%log_env, "sportsee_server: log filter");

    let handle = PrometheusBuilder::new().install_recorder()?;

    let settings = Settings::from_env().context("invalid configuration")?;
    let client = settings
        .client
        .build_client()
        .context("failed to build data provider")?;
    info!(
        base_url = %settings.client.base_url,
        source = ?settings.client.data_source,
        "data provider ready"
    );

    let state = Arc::new(AppState::new(client, settings.load_timeout).with_metrics(handle));
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(settings.address)
        .await
        .with_context(|| format!("failed to bind to address {}", settings.address))?;
    info!(addr = %settings.address, "starting HTTP server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("failed to install ctrl+c handler: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
