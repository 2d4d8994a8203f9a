//! Serving and graceful shutdown.
//!
//! The process moves through [`Phase`]s in order. Startup phases are driven by
//! [`run_server`](crate::run_server); [`serve`] owns `Serving` and `Draining`.

use axum::Router;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Starting,
    Connected,
    MigrationApplied,
    Serving,
    Draining,
    Stopped,
}

impl Phase {
    /// Records the transition into this phase.
    pub fn enter(self) {
        tracing::info!(phase = %self, "Entering phase.");
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Starting => "starting",
            Phase::Connected => "connected",
            Phase::MigrationApplied => "migration_applied",
            Phase::Serving => "serving",
            Phase::Draining => "draining",
            Phase::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("Server failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("In-flight requests did not finish within {0:?}")]
    DrainTimeout(Duration),

    #[error("Server task ended abnormally: {0}")]
    Task(#[from] JoinError),
}

/// Serves `router` on `listener` until `shutdown` resolves, then drains.
///
/// Once `shutdown` fires, no new connections are accepted while requests
/// already in flight run to completion. If they are not all done within
/// `drain_timeout` the server is abandoned and [`ServeError::DrainTimeout`]
/// is returned.
pub async fn serve<F>(
    listener: TcpListener,
    router: Router,
    shutdown: F,
    drain_timeout: Duration,
) -> Result<(), ServeError>
where
    F: Future<Output = ()> + Send,
{
    let (drain_tx, drain_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        let _ = drain_rx.await;
    });
    let mut server_task = tokio::spawn(async move { server.await });

    Phase::Serving.enter();
    tokio::select! {
        result = &mut server_task => {
            // The server stopped on its own, before any shutdown request.
            result??;
            return Ok(());
        }
        _ = shutdown => {}
    }

    Phase::Draining.enter();
    let _ = drain_tx.send(());
    match tokio::time::timeout(drain_timeout, &mut server_task).await {
        Ok(result) => {
            result??;
            Ok(())
        }
        Err(_) => {
            server_task.abort();
            Err(ServeError::DrainTimeout(drain_timeout))
        }
    }
}

/// Resolves on SIGINT or SIGTERM (ctrl-c only on non-unix targets).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c.");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM.");
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
    tracing::info!("Shutdown signal received.");
}
