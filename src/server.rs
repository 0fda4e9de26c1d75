//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, worker spawning, and Axum server lifecycle.

use crate::application::services::LinkService;
use crate::config::{Config, StoreBackend};
use crate::domain::hit_worker::run_hit_worker;
use crate::domain::repositories::LinkStore;
use crate::infrastructure::persistence::{
    MemoryLinkStore, PgLinkStore, RedisLinkStore, RetryingStore,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// How long shutdown waits for queued hits to be written.
const HIT_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - The configured link store (PostgreSQL runs migrations first)
/// - Background hit worker
/// - Axum HTTP server with graceful shutdown on Ctrl+C / SIGTERM
///
/// After the server stops accepting requests, the hit worker is given
/// [`HIT_DRAIN_TIMEOUT`] to flush its queue.
///
/// # Errors
///
/// Returns an error if:
/// - The store cannot be reached or migrated
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = build_store(&config).await?;

    if !store.health_check().await {
        anyhow::bail!("{} store failed its health check", config.store_backend);
    }

    let (hit_tx, hit_rx) = mpsc::channel(config.hit_queue_capacity);
    let worker = tokio::spawn(run_hit_worker(hit_rx, store.clone()));
    tracing::info!("Hit worker started");

    let link_service = LinkService::new(store, config.link_service_config(), hit_tx);
    let state = AppState::new(Arc::new(link_service));

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped, draining hit queue");

    match tokio::time::timeout(HIT_DRAIN_TIMEOUT, worker).await {
        Ok(Ok(())) => tracing::info!("Hit queue drained"),
        Ok(Err(e)) => tracing::error!("Hit worker panicked: {}", e),
        Err(_) => tracing::warn!(
            "Hit worker did not finish within {:?}, pending hits lost",
            HIT_DRAIN_TIMEOUT
        ),
    }

    Ok(())
}

/// Connects the backend selected by `STORE_BACKEND`.
///
/// Network backends are wrapped in [`RetryingStore`]; the memory store never
/// fails transiently.
async fn build_store(config: &Config) -> Result<Arc<dyn LinkStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store: links are lost on restart and not shared");
            Ok(Arc::new(MemoryLinkStore::new()))
        }
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is not configured")?;

            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
                .connect(url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;

            Ok(with_retries(PgLinkStore::new(Arc::new(pool)), config))
        }
        StoreBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .context("REDIS_URL is not configured")?;

            let store = RedisLinkStore::connect(url)
                .await
                .context("Failed to connect to Redis")?;

            Ok(with_retries(store, config))
        }
    }
}

fn with_retries<S: LinkStore + 'static>(store: S, config: &Config) -> Arc<dyn LinkStore> {
    Arc::new(
        RetryingStore::new(store)
            .with_max_attempts(config.store_max_attempts)
            .with_base_delay(Duration::from_millis(config.store_retry_base_ms)),
    )
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
