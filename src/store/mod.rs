//! Counter stores
//!
//! The keepalive loop only needs two things from its backend: an atomic
//! increment and a way to release the connection at shutdown.

mod memory;
mod redis_store;

pub use memory::MemoryCounterStore;
pub use redis_store::RedisCounterStore;

use async_trait::async_trait;

use crate::errors::Result;

#[async_trait]
pub trait CounterStore: Send + Sync {
    /// 原子自增，返回自增后的值
    async fn incr(&self, key: &str) -> Result<i64>;

    /// 释放连接。之后的 `incr` 返回 `StoreClosed`，重复关闭也返回错误。
    async fn close(&self) -> Result<()>;

    fn backend_name(&self) -> &'static str;
}
