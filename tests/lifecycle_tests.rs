use async_trait::async_trait;
use keepalive::config::CounterConfig;
use keepalive::errors::{KeepaliveError, Result};
use keepalive::runtime::run_until;
use keepalive::store::{CounterStore, MemoryCounterStore};
use keepalive::system::ShutdownSignal;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::oneshot;

/// 模拟不可达的 Redis
#[derive(Default)]
struct UnreachableStore {
    incr_calls: AtomicUsize,
    close_calls: AtomicUsize,
}

#[async_trait]
impl CounterStore for UnreachableStore {
    async fn incr(&self, _key: &str) -> Result<i64> {
        self.incr_calls.fetch_add(1, Ordering::SeqCst);
        Err(KeepaliveError::redis_connection("Connection refused (os error 111)"))
    }

    async fn close(&self) -> Result<()> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "unreachable"
    }
}

/// 关闭时报错的存储
#[derive(Default)]
struct FailingCloseStore {
    inner: MemoryCounterStore,
}

#[async_trait]
impl CounterStore for FailingCloseStore {
    async fn incr(&self, key: &str) -> Result<i64> {
        self.inner.incr(key).await
    }

    async fn close(&self) -> Result<()> {
        Err(KeepaliveError::redis_connection("broken pipe"))
    }

    fn backend_name(&self) -> &'static str {
        "failing-close"
    }
}

fn signal_on(rx: oneshot::Receiver<()>) -> impl Future<Output = Result<ShutdownSignal>> {
    async move {
        let _ = rx.await;
        Ok(ShutdownSignal::Terminate)
    }
}

#[cfg(test)]
mod keepalive_lifecycle_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_each_tick_increments_counter_once() {
        let store = Arc::new(MemoryCounterStore::new());
        let (tx, rx) = oneshot::channel();

        let handle = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                run_until(store, &CounterConfig::default(), signal_on(rx)).await
            })
        };

        // 首次 tick 在一个完整周期之后
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(store.get("counter"), None);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(store.get("counter"), Some(1));

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(store.get("counter"), Some(3));

        tx.send(()).unwrap();
        let stats = tokio_test::assert_ok!(handle.await.unwrap());

        assert_eq!(stats.ticks(), 3);
        assert_eq!(stats.failures(), 0);
        assert_eq!(stats.last_value(), Some(3));
        assert!(store.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_key_and_interval() {
        let store = Arc::new(MemoryCounterStore::new());
        let (tx, rx) = oneshot::channel();
        let counter = CounterConfig {
            key: "heartbeat".to_string(),
            interval_secs: 5,
            timeout_ms: 100,
        };

        let handle = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { run_until(store, &counter, signal_on(rx)).await })
        };

        tokio::time::sleep(Duration::from_secs(26)).await;
        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();

        assert_eq!(store.get("heartbeat"), Some(5));
        assert_eq!(store.get("counter"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreachable_store_keeps_running() {
        let store = Arc::new(UnreachableStore::default());
        let (tx, rx) = oneshot::channel();

        let handle = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                run_until(store, &CounterConfig::default(), signal_on(rx)).await
            })
        };

        tokio::time::sleep(Duration::from_secs(3 * 60 + 1)).await;
        assert_eq!(store.incr_calls.load(Ordering::SeqCst), 3);
        assert!(!handle.is_finished());

        tx.send(()).unwrap();
        let stats = handle.await.unwrap().unwrap();

        assert_eq!(stats.ticks(), 3);
        assert_eq!(stats.failures(), 3);
        assert_eq!(stats.last_value(), None);
        assert_eq!(store.close_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_failure_is_not_fatal() {
        let store = Arc::new(FailingCloseStore::default());
        let (tx, rx) = oneshot::channel();

        let handle = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                run_until(store, &CounterConfig::default(), signal_on(rx)).await
            })
        };

        tokio::time::sleep(Duration::from_secs(61)).await;
        tx.send(()).unwrap();

        let stats = tokio_test::assert_ok!(handle.await.unwrap());
        assert_eq!(stats.ticks(), 1);
        assert_eq!(store.inner.get("counter"), Some(1));
    }

    #[tokio::test]
    async fn test_signal_error_still_closes_store() {
        let store = Arc::new(MemoryCounterStore::new());

        let result = run_until(
            Arc::clone(&store) as Arc<dyn CounterStore>,
            &CounterConfig::default(),
            async { Err(KeepaliveError::signal_operation("no signal support")) },
        )
        .await;

        assert!(matches!(result, Err(KeepaliveError::SignalOperation(_))));
        assert!(store.is_closed());
        assert_eq!(store.get("counter"), None);
    }

    #[tokio::test]
    async fn test_shutdown_is_prompt() {
        let store = Arc::new(MemoryCounterStore::new());

        let started = std::time::Instant::now();
        let stats = run_until(
            Arc::clone(&store) as Arc<dyn CounterStore>,
            &CounterConfig::default(),
            async { Ok(ShutdownSignal::Interrupt) },
        )
        .await
        .unwrap();

        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(stats.ticks(), 0);
        assert!(store.is_closed());
    }
}
