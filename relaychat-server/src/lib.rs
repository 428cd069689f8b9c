//! Relaychat HTTP front end
//!
//! Serves the chat page and relays `POST /chat` requests to a streaming
//! completion provider through [`relaychat_core::CompletionAggregator`].

pub mod error;
pub mod routes;

pub use error::ChatError;
pub use routes::{router, AppState, IndexPage};

use anyhow::Result;
use relaychat_core::config::ServerConfig;
use tokio::net::TcpListener;
use tracing::info;

/// Log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info,relaychat_core=debug,relaychat_server=debug";

/// Bind `config.bind_addr` and serve until Ctrl+C or SIGTERM.
///
/// In-flight requests are allowed to finish before returning.
pub async fn run_http(state: AppState, config: &ServerConfig) -> Result<()> {
    let app = router(state, &config.static_dir);
    let listener = TcpListener::bind(&config.bind_addr).await?;

    info!(
        "relaychat listening on {} (static dir: {})",
        listener.local_addr()?,
        config.static_dir.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("relaychat stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("Shutdown signal received");
}
