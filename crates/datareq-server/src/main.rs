//! Data Request Server - Main entry point

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Result;
use datareq_common::logging::{init_logging, LogConfig};
use tokio::signal;
use tracing::info;

use datareq_server::{
    access::DefaultAccessPolicy,
    api,
    catalog::{CachedCatalog, HttpCatalog, UserCache},
    config::Config,
    db,
    features::{shared::CatalogValidator, FeatureState},
    store::{DataRequestStore, PgStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    let log_config = LogConfig::builder()
        .log_file_prefix("datareq-server")
        .filter_directives("datareq_server=debug,tower_http=debug,sqlx=info")
        .build();

    // Environment variables take precedence
    let log_config = log_config.merge_env()?;

    let _log_guard = init_logging(&log_config)?;

    info!("Starting Data Request Server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let pool = db::create_pool(&config.database).await?;
    info!("Database connection pool established");

    let store = Arc::new(PgStore::new(pool));
    store.init().await?;
    info!("Database migrations completed");

    let http_catalog = HttpCatalog::new(
        config.catalog.url.clone(),
        config.catalog.api_key.clone(),
        config.catalog.timeout(),
    )?;
    let users = Arc::new(UserCache::new(config.cache.capacity, config.cache.ttl()));
    let catalog = Arc::new(CachedCatalog::new(http_catalog, users));
    info!(catalog_url = %config.catalog.url, "Catalog client initialized");

    let state = FeatureState {
        store: store.clone(),
        access: Arc::new(DefaultAccessPolicy::new(store.clone())),
        validator: Arc::new(CatalogValidator::new(store.clone(), catalog.clone())),
        catalog,
        page_size: config.listing.per_page,
        callers: config.callers.clone(),
    };

    let app = api::create_router(state, &config.cors);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_secs))
        .await?;

    info!("Server shut down gracefully");

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }

    // Give in-flight requests a moment to finish
    info!("Waiting up to {} seconds for connections to close", timeout_secs);
    tokio::time::sleep(Duration::from_secs(timeout_secs.min(5))).await;
}
