//! Process lifecycle
//!
//! Startup builds the config and store once, the keepalive loop runs on a
//! spawned task, and the main routine waits for a termination signal before
//! cancelling the loop and closing the store.

pub mod lifetime;

use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::CounterConfig;
use crate::errors::Result;
use crate::keepalive::{Keepalive, KeepaliveStats};
use crate::store::CounterStore;
use crate::system::{ShutdownSignal, wait_for_shutdown_signal};
use lifetime::startup::{StartupContext, prepare_startup};

/// Run the whole program until SIGINT or SIGTERM.
pub async fn run() -> Result<()> {
    let StartupContext {
        config,
        store,
        log_guard: _log_guard,
    } = prepare_startup()?;

    run_until(store, &config.counter, wait_for_shutdown_signal()).await?;
    Ok(())
}

/// Run the keepalive loop until `shutdown_signal` resolves, then shut down.
///
/// An error from `shutdown_signal` still triggers a full shutdown and is
/// returned afterwards.
pub async fn run_until<F>(
    store: Arc<dyn CounterStore>,
    counter: &CounterConfig,
    shutdown_signal: F,
) -> Result<Arc<KeepaliveStats>>
where
    F: Future<Output = Result<ShutdownSignal>>,
{
    let keepalive = Keepalive::new(Arc::clone(&store), counter);
    let stats = keepalive.stats();
    let token = CancellationToken::new();

    let task = {
        let token = token.clone();
        tokio::spawn(async move { keepalive.run(token).await })
    };
    debug!("Keepalive task spawned");

    let received = shutdown_signal.await;
    match &received {
        Ok(signal) => info!("{} received, shutting down...", signal),
        Err(e) => error!("{}, shutting down...", e),
    }

    lifetime::shutdown::shutdown(token, task, store).await;

    info!(
        "Keepalive stopped after {} ticks ({} failed)",
        stats.ticks(),
        stats.failures()
    );

    received.map(|_| stats)
}
