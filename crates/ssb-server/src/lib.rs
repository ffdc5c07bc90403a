//! Supplement Safety Bible server
//!
//! HTTP front end for the pairwise interaction checker. Exposes the stack
//! check and a health endpoint over a Supabase-backed store.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::ServerConfig;
use handlers::{create_router, AppState};
use ssb_domain::StackChecker;
use ssb_store::{StoreError, SupabaseStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Store construction error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Install the global tracing subscriber
///
/// Honors `RUST_LOG`, defaulting to `info`. Safe to call more than once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Build the application state for a configuration
pub fn build_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    let store = Arc::new(SupabaseStore::new(&config.supabase)?);
    info!("Supabase REST endpoint: {}", store.rest_url());

    Ok(AppState {
        checker: StackChecker::new(store.clone(), store),
        request_timeout: config.request_timeout(),
    })
}

/// Start the HTTP server
///
/// Builds the store and checker, binds the configured address and serves
/// until Ctrl-C or SIGTERM.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    info!("Starting Supplement Safety Bible server");
    info!("Bind address: {}", config.bind_addr());
    info!("Check timeout: {} seconds", config.request_timeout_secs);

    let state = build_state(&config)?;
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received");
}
