use std::future::Future;
use std::time::Duration;

use tokio::signal;
use tokio::sync::watch;

/// Resolves on SIGINT or SIGTERM so the server stops accepting connections.
/// `fired` is flipped once the signal arrives, which starts the drain deadline
/// enforced by [`graceful`].
pub async fn shutdown_signal(fired: watch::Sender<bool>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, initiating graceful shutdown");
        }
    }

    let _ = fired.send(true);
}

/// Drive `server` to completion, giving it at most `timeout` to drain
/// once `fired` flips. Connections still open after the deadline are
/// abandoned and the server is reported as stopped.
pub async fn graceful<F, E>(
    server: F,
    mut fired: watch::Receiver<bool>,
    timeout: Duration,
) -> Result<(), E>
where
    F: Future<Output = Result<(), E>>,
{
    tokio::pin!(server);

    let signalled = tokio::select! {
        result = &mut server => return result,
        changed = fired.wait_for(|fired| *fired) => changed.is_ok(),
    };

    // sender dropped without a signal: no deadline applies
    if !signalled {
        return server.await;
    }

    tracing::info!(
        timeout_secs = timeout.as_secs(),
        "allowing connections to drain"
    );

    match tokio::time::timeout(timeout, server).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                timeout_secs = timeout.as_secs(),
                "connections still open after shutdown timeout, forcing exit"
            );
            Ok(())
        }
    }
}
