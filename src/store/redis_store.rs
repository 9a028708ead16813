use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, trace, warn};

use super::CounterStore;
use crate::errors::{KeepaliveError, Result};

/// Redis-backed counter.
///
/// The TCP connection is opened lazily on the first increment, so an
/// unreachable server at startup only shows up as per-tick errors.
pub struct RedisCounterStore {
    client: redis::Client,
    /// 持久化连接，使用 RwLock 保护
    connection: RwLock<Option<MultiplexedConnection>>,
    closed: AtomicBool,
    display_url: String,
}

impl RedisCounterStore {
    /// 解析连接串并创建客户端（不建立连接）
    pub fn open(url: &str) -> Result<Self> {
        let display_url = redact_url(url);
        let client = redis::Client::open(url).map_err(|e| {
            KeepaliveError::invalid_redis_url(format!("{}: {}", display_url, e))
        })?;

        debug!("Redis client created for {}", display_url);

        Ok(Self {
            client,
            connection: RwLock::new(None),
            closed: AtomicBool::new(false),
            display_url,
        })
    }

    /// 连接串（密码已隐藏），用于日志
    pub fn display_url(&self) -> &str {
        &self.display_url
    }

    /// 获取或建立持久连接
    async fn get_connection(&self) -> Result<MultiplexedConnection> {
        {
            let conn_guard = self.connection.read().await;
            if let Some(ref conn) = *conn_guard {
                return Ok(conn.clone());
            }
        }

        let mut conn_guard = self.connection.write().await;

        // 双重检查，避免竞态条件
        if let Some(ref conn) = *conn_guard {
            return Ok(conn.clone());
        }

        // 不使用驱动自带的超时（默认 1s 连接 / 500ms 响应），由调用方的 tick 超时统一约束
        let config = redis::AsyncConnectionConfig::new()
            .set_connection_timeout(None)
            .set_response_timeout(None);
        let new_conn = self
            .client
            .get_multiplexed_async_connection_with_config(&config)
            .await
            .map_err(|e| {
                KeepaliveError::redis_connection(format!("{}: {}", self.display_url, e))
            })?;
        *conn_guard = Some(new_conn.clone());
        debug!("Redis connection established and cached");

        Ok(new_conn)
    }

    /// 重置连接（在连接错误时调用）
    async fn reset_connection(&self) {
        let mut conn_guard = self.connection.write().await;
        *conn_guard = None;
        debug!("Redis connection reset due to error");
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn incr(&self, key: &str) -> Result<i64> {
        if self.closed.load(Ordering::Acquire) {
            return Err(KeepaliveError::store_closed("redis connection is closed"));
        }

        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                self.reset_connection().await;
                return Err(e);
            }
        };

        match redis::cmd("INCR")
            .arg(key)
            .query_async::<i64>(&mut conn)
            .await
        {
            Ok(value) => {
                trace!("INCR {} -> {}", key, value);
                Ok(value)
            }
            Err(e) => {
                let err = KeepaliveError::from(e);
                // 连接可能已断开，重置连接；命令错误（如 WRONGTYPE）保留连接
                if matches!(err, KeepaliveError::RedisConnection(_)) {
                    self.reset_connection().await;
                }
                Err(err)
            }
        }
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(KeepaliveError::store_closed("redis connection already closed"));
        }

        // The multiplexed driver task exits once its last handle is dropped.
        match self.connection.write().await.take() {
            Some(conn) => {
                drop(conn);
                debug!("Redis connection to {} released", self.display_url);
            }
            None => {
                warn!("Redis connection was never established, nothing to release");
            }
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

/// Hide the password part of a connection string.
fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("***"));
            }
            parsed.to_string()
        }
        Err(_) => "<unparseable url>".to_string(),
    }
}
