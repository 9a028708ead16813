use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use super::CounterStore;
use crate::errors::{KeepaliveError, Result};

/// In-process counters, for tests and dry runs without a Redis server.
#[derive(Default)]
pub struct MemoryCounterStore {
    inner: DashMap<String, i64>,
    closed: AtomicBool,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<i64> {
        self.inner.get(key).map(|v| *v)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn incr(&self, key: &str) -> Result<i64> {
        if self.is_closed() {
            return Err(KeepaliveError::store_closed("memory store is closed"));
        }
        let mut entry = self.inner.entry(key.to_string()).or_insert(0);
        *entry += 1;
        Ok(*entry)
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(KeepaliveError::store_closed("memory store already closed"));
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
