//! Axum API server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use z83_api::{create_router, metrics, ApiConfig, AppState};
use z83_store::{MemoryStore, PgStore, Store, StoreConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing();

    info!("Starting z83-api");

    let config = ApiConfig::from_env().context("Invalid API configuration")?;
    info!(
        host = %config.host,
        port = config.port,
        environment = %config.environment,
        token_ttl_secs = config.auth.token_ttl.as_secs(),
        "API config loaded"
    );

    let store = connect_store().await?;
    let state = AppState::new(config.clone(), store);

    let metrics_enabled = std::env::var("METRICS_ENABLED")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(true);

    let metrics_handle = if metrics_enabled {
        let handle = metrics::init_metrics().context("Failed to install Prometheus recorder")?;
        info!("Prometheus metrics enabled at /metrics");
        Some(handle)
    } else {
        None
    };

    let app = create_router(state, metrics_handle);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid bind address")?;

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Colored output for dev, JSON when `LOG_FORMAT=json`.
fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,z83_api=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

/// PostgreSQL unless `STORE_BACKEND=memory`.
async fn connect_store() -> anyhow::Result<Arc<dyn Store>> {
    let backend = std::env::var("STORE_BACKEND").unwrap_or_else(|_| "postgres".to_string());

    if backend.eq_ignore_ascii_case("memory") {
        warn!("Using in-memory store; data is lost on restart");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store_config = StoreConfig::from_env();

    let store = PgStore::connect(&store_config)
        .await
        .context("Failed to connect to PostgreSQL")?;
    store
        .check_connectivity()
        .await
        .context("PostgreSQL is not reachable")?;
    store
        .ensure_schema()
        .await
        .context("Failed to apply schema")?;

    Ok(Arc::new(store))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
