use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::errors::{KeepaliveError, Result};

/// 环境变量前缀，分隔符为 `__`
pub const ENV_PREFIX: &str = "KEEPALIVE";

/// 必填的 Redis 连接串环境变量
pub const REDIS_URL_VAR: &str = "REDIS_URL";

/// 可调参数（从 config.toml 和 KEEPALIVE__* 环境变量加载）
///
/// 连接串不在这里：它只能来自 `REDIS_URL`。
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub counter: CounterConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：KEEPALIVE，分隔符：__
    /// 示例：KEEPALIVE__COUNTER__INTERVAL_SECS=30
    pub fn load_from(path: &Path, env: config::Map<String, String>) -> Result<Self> {
        use config::{Config, Environment, File};

        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(env)),
            )
            .build()?;

        Ok(settings.try_deserialize::<StaticConfig>()?)
    }
}

/// 计数器配置
#[derive(Debug, Clone, Deserialize)]
pub struct CounterConfig {
    #[serde(default = "default_counter_key")]
    pub key: String,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl CounterConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            return Err(KeepaliveError::invalid_config("counter.key must not be empty"));
        }
        // tokio::time::interval panics on a zero period
        if self.interval_secs == 0 {
            return Err(KeepaliveError::invalid_config(
                "counter.interval_secs must be greater than 0",
            ));
        }
        if self.timeout_ms == 0 {
            return Err(KeepaliveError::invalid_config(
                "counter.timeout_ms must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<()> {
        match self.format.as_str() {
            "text" | "json" => Ok(()),
            other => Err(KeepaliveError::invalid_config(format!(
                "logging.format must be \"text\" or \"json\", got \"{}\"",
                other
            ))),
        }
    }
}

// ============================================================
// Default value functions
// ============================================================

fn default_counter_key() -> String {
    "counter".to_string()
}

fn default_interval_secs() -> u64 {
    60
}

fn default_timeout_ms() -> u64 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> Option<String> {
    None
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            key: default_counter_key(),
            interval_secs: default_interval_secs(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}
