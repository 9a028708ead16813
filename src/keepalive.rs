//! Periodic counter increment
//!
//! Every `interval` the loop issues one bounded increment against the
//! counter key and logs the outcome. Failures never stop the loop.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior, interval_at, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::CounterConfig;
use crate::errors::{KeepaliveError, Result};
use crate::store::CounterStore;

/// 运行统计（仅进程内，不持久化）
#[derive(Debug, Default)]
pub struct KeepaliveStats {
    ticks: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
    last_value: AtomicI64,
}

impl KeepaliveStats {
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Last counter value seen, if any tick has succeeded.
    pub fn last_value(&self) -> Option<i64> {
        if self.successes.load(Ordering::Acquire) == 0 {
            return None;
        }
        Some(self.last_value.load(Ordering::Relaxed))
    }
}

pub struct Keepalive {
    store: Arc<dyn CounterStore>,
    key: String,
    interval: Duration,
    timeout: Duration,
    started_at: DateTime<Utc>,
    stats: Arc<KeepaliveStats>,
}

impl Keepalive {
    pub fn new(store: Arc<dyn CounterStore>, config: &CounterConfig) -> Self {
        Self {
            store,
            key: config.key.clone(),
            interval: config.interval(),
            timeout: config.timeout(),
            started_at: Utc::now(),
            stats: Arc::new(KeepaliveStats::default()),
        }
    }

    pub fn stats(&self) -> Arc<KeepaliveStats> {
        Arc::clone(&self.stats)
    }

    /// 单次自增，受超时限制
    pub async fn tick(&self) -> Result<i64> {
        self.stats.ticks.fetch_add(1, Ordering::Relaxed);

        let outcome = match timeout(self.timeout, self.store.incr(&self.key)).await {
            Ok(res) => res,
            Err(_) => Err(KeepaliveError::timeout(format!(
                "INCR {} did not complete within {} ms",
                self.key,
                self.timeout.as_millis()
            ))),
        };

        match outcome {
            Ok(value) => {
                self.stats.last_value.store(value, Ordering::Relaxed);
                self.stats.successes.fetch_add(1, Ordering::Release);
                Ok(value)
            }
            Err(e) => {
                self.stats.failures.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    /// Run until `token` is cancelled.
    ///
    /// The first increment happens one full interval after the call. A
    /// cancelled token also abandons an increment that is still in flight.
    pub async fn run(&self, token: CancellationToken) {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Keepalive started: INCR '{}' on {} every {}s (timeout {} ms)",
            self.key,
            self.store.backend_name(),
            self.interval.as_secs(),
            self.timeout.as_millis()
        );

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!("Keepalive cancelled with an increment in flight");
                    break;
                }
                res = self.tick() => self.report(res),
            }
        }

        debug!("Keepalive loop exited");
    }

    fn report(&self, res: Result<i64>) {
        match res {
            Ok(value) => {
                let uptime_secs = Utc::now()
                    .signed_duration_since(self.started_at)
                    .num_seconds();
                info!(counter = value, uptime_secs, "Counter: {}", value);
            }
            Err(e) => {
                error!("Keepalive increment error: {}", e);
            }
        }
    }
}
