//! Posts Cache - A small social-posting backend
//!
//! Serves username lookups (with posts preloaded) from an in-process ordered
//! index that is rebuilt wholesale from the backing store on a fixed interval.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use posts_cache::api::create_router;
use posts_cache::store::MemoryStore;
use posts_cache::{spawn_refresh_task, AppState, Config, UserLookupCache};

/// Main entry point for the posting server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the backing store and seed configured users
/// 4. Build the lookup cache and populate it once before serving
/// 5. Start the background refresh task
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "posts_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting posts cache server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: refresh_interval={}s, max_page_size={}, default_page_size={}, max_post_length={}, port={}",
        config.refresh_interval,
        config.max_page_size,
        config.default_page_size,
        config.max_post_length,
        config.server_port
    );

    let store = Arc::new(
        MemoryStore::with_users(&config.seed_users)
            .await
            .context("failed to seed users")?,
    );
    info!("Backing store seeded with {} users", config.seed_users.len());

    let cache = Arc::new(UserLookupCache::new(store, config.limits()));

    // Populate before accepting traffic; the scheduled task retries on failure
    if let Err(err) = cache.refresh().await {
        error!("Initial cache population failed: {}", err);
    }

    let refresh_handle = spawn_refresh_task(cache.clone(), config.refresh_interval);
    info!("Background refresh task started");

    let app = create_router(AppState::new(cache));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(refresh_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the refresh task and allows graceful shutdown.
async fn shutdown_signal(refresh_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    refresh_handle.abort();
    warn!("Refresh task aborted");
}
