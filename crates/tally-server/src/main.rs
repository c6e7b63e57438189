//! Issue Tally server.
//!
//! - JSON API under `/api` (month read, increment, reset, catalog, summary)
//! - Client bundle with SPA fallback when `server.static_dir` is set
//! - Ops endpoints: /healthz, /readyz, /metrics
//! - Graceful shutdown on Ctrl+C / SIGTERM, then the store is closed

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use tally_core::error::{Result, TallyError};
use tally_server::{app_state::AppState, config, router};

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, code = e.client_code().as_str(), "tally-server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cfg = config::load_from_env()?;
    let listen: SocketAddr = cfg
        .server
        .listen
        .parse()
        .map_err(|e| TallyError::BadRequest(format!("server.listen must be a valid SocketAddr: {e}")))?;

    let state = AppState::open(cfg).await?;
    let app = router::build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| TallyError::Internal(format!("failed to bind {listen}: {e}")))?;
    tracing::info!(%listen, "tally-server starting");

    let drain = state.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            drain.set_draining();
        })
        .await
        .map_err(|e| TallyError::Internal(format!("server failed: {e}")))?;

    state.shutdown().await?;
    tracing::info!("tally-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        tracing::info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install signal handler");
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
}
