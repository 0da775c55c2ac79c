use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skiff_api::config::ServerConfig;
use skiff_api::router::build_app_router;
use skiff_api::state::AppState;
use skiff_cloud::digitalocean::DigitalOceanConnector;
use skiff_core::pool::WorkerPool;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "skiff_api=debug,skiff_cloud=debug,skiff_core=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Worker pool ---
    let pool = config.pool_file.as_ref().map(|path| {
        let pool = WorkerPool::load(path)
            .unwrap_or_else(|e| panic!("Failed to load pool file {}: {e}", path.display()));
        tracing::info!(
            pool = %pool.name(),
            templates = pool.templates().len(),
            "Worker pool loaded",
        );
        Arc::new(pool)
    });
    if pool.is_none() {
        tracing::warn!("SKIFF_POOL_FILE not set; provisioning endpoints are disabled");
    }

    // --- Provider ---
    let connector = DigitalOceanConnector::new(
        config.do_api_url.clone(),
        config.do_page_size,
        Duration::from_secs(config.request_timeout_secs),
    )
    .expect("Failed to build HTTP client");

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        connector: Arc::new(connector),
        pool,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
