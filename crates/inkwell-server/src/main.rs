//! Inkwell server entry point.
//!
//! Opens the document store, points the credential store at its YAML file,
//! derives the session key, then starts the Axum HTTP server with graceful
//! shutdown.

use std::sync::Arc;

use anyhow::Context;
use axum_extra::extract::cookie::Key;
use tokio::net::TcpListener;
use tracing::{info, warn};

use inkwell_core::credentials::CredentialStore;
use inkwell_core::document::DocumentStore;
use inkwell_storage::{FsBackend, MemoryBackend, StorageBackend};

use inkwell_server::config::{ServerConfig, StorageBackendType};
use inkwell_server::routes;
use inkwell_server::state::{AppState, derive_cookie_key};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!(
        environment = ?config.environment,
        storage = ?config.storage_backend,
        "Inkwell starting"
    );

    let state = build_app_state(&config)?;
    let app = routes::build_router(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "Inkwell server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Inkwell server stopped");
    Ok(())
}

/// Build the shared application state.
fn build_app_state(config: &ServerConfig) -> anyhow::Result<Arc<AppState>> {
    let storage: Arc<dyn StorageBackend> = match &config.storage_backend {
        StorageBackendType::Memory => {
            info!("using in-memory storage (documents will not persist)");
            Arc::new(MemoryBackend::new())
        }
        StorageBackendType::Filesystem { path } => {
            info!(path = %path.display(), "using filesystem storage");
            Arc::new(FsBackend::open(path).context("failed to open document root")?)
        }
    };

    let credentials = CredentialStore::new(&config.credentials_path);
    if !config.credentials_path.is_file() {
        warn!(
            path = %config.credentials_path.display(),
            "credential file not found; sign-in will fail until it exists"
        );
    }

    let cookie_key = if let Some(secret) = &config.session_secret {
        derive_cookie_key(secret)
    } else {
        warn!("INKWELL_SESSION_SECRET not set; sessions will not survive a restart");
        Key::generate()
    };

    Ok(Arc::new(AppState::new(
        DocumentStore::new(storage),
        credentials,
        cookie_key,
    )))
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}
