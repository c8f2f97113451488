use tracing::{info, warn};

/// Resolves once the process is asked to stop: Ctrl-C everywhere, SIGTERM on
/// Unix as well.
pub async fn shutdown_signal() {
    tokio::select! {
        () = interrupt() => info!("received SIGINT, shutting down"),
        () = terminate() => info!("received SIGTERM, shutting down"),
    }
}

async fn interrupt() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(error = %error, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(error) => {
            warn!(error = %error, "cannot listen for SIGTERM");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
