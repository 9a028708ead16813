use crate::errors::{KeepaliveError, Result};
use std::fmt;
use tracing::info;

/// Which signal asked the process to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownSignal::Interrupt => write!(f, "SIGINT"),
            ShutdownSignal::Terminate => write!(f, "SIGTERM"),
        }
    }
}

/// Block until SIGINT or SIGTERM arrives.
///
/// Handlers are registered on the first poll, so call this before any work
/// that a signal should be able to interrupt.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> Result<ShutdownSignal> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt()).map_err(|e| {
        KeepaliveError::signal_operation(format!("Failed to listen for SIGINT: {}", e))
    })?;
    let mut sigterm = signal(SignalKind::terminate()).map_err(|e| {
        KeepaliveError::signal_operation(format!("Failed to listen for SIGTERM: {}", e))
    })?;
    info!("Waiting for SIGINT or SIGTERM");

    tokio::select! {
        _ = sigint.recv() => Ok(ShutdownSignal::Interrupt),
        _ = sigterm.recv() => Ok(ShutdownSignal::Terminate),
    }
}

#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> Result<ShutdownSignal> {
    info!("Waiting for Ctrl+C");
    tokio::signal::ctrl_c().await.map_err(|e| {
        KeepaliveError::signal_operation(format!("Failed to listen for Ctrl+C: {}", e))
    })?;
    Ok(ShutdownSignal::Interrupt)
}
