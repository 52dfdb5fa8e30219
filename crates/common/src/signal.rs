//! Process signal helpers shared by binaries and the HTTP server.

use tracing::{info, warn};

/// Resolves once Ctrl+C is received. Used as the graceful shutdown trigger
/// for `axum::serve`.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!(event = "shutdown_signal", "received Ctrl+C, shutting down"),
        Err(e) => {
            // Without a signal handler the server can only stop by being killed.
            warn!(event = "signal_handler_failed", error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}
