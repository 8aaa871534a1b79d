//! Cooperative termination at the process-signal boundary.
//!
//! Workers race their main loop against `shutdown_signal()`. When the
//! orchestrator (or a terminal) signals the process, the loop future is
//! dropped and every socket it owns is released before `main` returns.

use log::{info, warn};

/// Resolves once the process receives SIGTERM or SIGINT.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received interrupt, shutting down."),
        _ = terminate => info!("Received termination request, shutting down."),
    }
}
