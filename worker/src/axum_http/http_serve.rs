use crate::{axum_http::default_routers, config::config_model::DotEnvyConfig};
use anyhow::Result;
use axum::{Router, routing::get};
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

/// The worker exposes only a liveness endpoint; everything else it does runs
/// in background tasks.
pub async fn start(config: Arc<DotEnvyConfig>) -> Result<()> {
    let body_limit_bytes: usize = (config.worker_server.body_limit * 1024 * 1024).try_into()?;

    let app = Router::new()
        .route("/health-check", get(default_routers::health_check))
        .fallback(default_routers::not_found)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.worker_server.timeout,
        )))
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(("0.0.0.0", config.worker_server.port)).await?;
    info!(port = config.worker_server.port, "Worker HTTP server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown())
        .await?;
    Ok(())
}

async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM signal handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => info!("Received ctrl+C signal"),
            _ = sigterm.recv() => info!("Received terminate signal"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Received ctrl+C signal");
    }
}
