use std::{sync::Arc, time::Duration};

use anyhow::Result;
use bitebuddy_mealdb::MealDbClient;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{config::Config, routes::AppState};

pub async fn serve(
    config: Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!("Starting bitebuddy server...");

    let host = host_override.unwrap_or(config.server.host.to_owned());
    let port = port_override.unwrap_or(config.server.port);

    let pool = crate::db::create_pool(&config.database.url, config.database.max_connections).await?;

    let api = MealDbClient::new(
        config.mealdb.base_url.to_owned(),
        Duration::from_secs(config.mealdb.timeout_secs),
    )?;
    tracing::info!(base_url = %config.mealdb.base_url, "Recipe API client ready");

    let state = AppState::new(config, pool.clone(), Arc::new(api))?;

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    run(listener, state, shutdown_signal()).await?;

    tracing::info!("Closing database pool...");
    pool.close().await;

    tracing::info!("Graceful shutdown complete");

    Ok(())
}

/// Serves `state` on `listener` until `signal` resolves.
///
/// Open recipe streams are ended once the signal fires, then queued deletes are flushed.
pub async fn run(
    listener: TcpListener,
    state: AppState,
    signal: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let batcher = state.batcher.clone();
    let streams = state.clone();

    let app = crate::routes::router(state).layer(TraceLayer::new_for_http());

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            signal.await;
            streams.shutdown();
        })
        .await?;

    tracing::info!("Flushing pending recipe deletes...");
    batcher.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }

    tracing::info!("Starting graceful shutdown...");
}
