use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tokio::signal;
use tracing::info;

use prompt_config::SdkConfig;
use prompt_observability::{init_metrics, init_tracing, shutdown_tracer};
use prompt_sdk::modules::NoPhaseSettings;
use prompt_sdk::{PhaseHandlers, init_app_state, init_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing("prompt-phase-server");

    let config = SdkConfig::from_env();
    let address = config.server.address.clone();
    let state = init_app_state(config).await?;

    let handlers = PhaseHandlers {
        config: Arc::new(NoPhaseSettings),
        copy: Arc::new(NoPhaseSettings),
    };
    let app = init_router(state, handlers);

    #[cfg(feature = "observability")]
    let app = match init_metrics() {
        Some(handle) => app.merge(prompt_observability::metrics_app(handle)),
        None => app,
    };
    #[cfg(not(feature = "observability"))]
    let _ = init_metrics();

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!(%address, "Phase server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    shutdown_tracer().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");
}
