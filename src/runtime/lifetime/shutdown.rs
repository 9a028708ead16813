use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::store::CounterStore;

/// 等待后台任务退出的超时时间（秒）
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 5;

/// Stop the keepalive task and release the store.
///
/// Never fails: a task that overruns the timeout is aborted and a close
/// error is only logged.
pub async fn shutdown(
    token: CancellationToken,
    task: JoinHandle<()>,
    store: Arc<dyn CounterStore>,
) {
    token.cancel();

    let abort = task.abort_handle();
    match timeout(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS), task).await {
        Ok(Ok(())) => {
            debug!("Keepalive task stopped");
        }
        Ok(Err(e)) => {
            error!("Keepalive task ended abnormally: {}", e);
        }
        Err(_) => {
            warn!(
                "Keepalive task did not stop within {} seconds, aborting",
                SHUTDOWN_TIMEOUT_SECS
            );
            abort.abort();
        }
    }

    match store.close().await {
        Ok(()) => {
            info!("{} connection closed", store.backend_name());
        }
        Err(e) => {
            error!("Error closing {} connection: {}", store.backend_name(), e);
        }
    }
}
