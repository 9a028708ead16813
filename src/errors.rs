use std::fmt;

#[derive(Debug, Clone)]
pub enum KeepaliveError {
    MissingConfig(String),
    InvalidConfig(String),
    InvalidRedisUrl(String),
    RedisConnection(String),
    RedisCommand(String),
    Timeout(String),
    StoreClosed(String),
    SignalOperation(String),
    Logging(String),
}

impl KeepaliveError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            KeepaliveError::MissingConfig(_) => "E001",
            KeepaliveError::InvalidConfig(_) => "E002",
            KeepaliveError::InvalidRedisUrl(_) => "E003",
            KeepaliveError::RedisConnection(_) => "E004",
            KeepaliveError::RedisCommand(_) => "E005",
            KeepaliveError::Timeout(_) => "E006",
            KeepaliveError::StoreClosed(_) => "E007",
            KeepaliveError::SignalOperation(_) => "E008",
            KeepaliveError::Logging(_) => "E009",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            KeepaliveError::MissingConfig(_) => "Missing Configuration",
            KeepaliveError::InvalidConfig(_) => "Invalid Configuration",
            KeepaliveError::InvalidRedisUrl(_) => "Invalid Redis URL",
            KeepaliveError::RedisConnection(_) => "Redis Connection Error",
            KeepaliveError::RedisCommand(_) => "Redis Command Error",
            KeepaliveError::Timeout(_) => "Timeout",
            KeepaliveError::StoreClosed(_) => "Store Closed",
            KeepaliveError::SignalOperation(_) => "Signal Operation Error",
            KeepaliveError::Logging(_) => "Logging Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            KeepaliveError::MissingConfig(msg)
            | KeepaliveError::InvalidConfig(msg)
            | KeepaliveError::InvalidRedisUrl(msg)
            | KeepaliveError::RedisConnection(msg)
            | KeepaliveError::RedisCommand(msg)
            | KeepaliveError::Timeout(msg)
            | KeepaliveError::StoreClosed(msg)
            | KeepaliveError::SignalOperation(msg)
            | KeepaliveError::Logging(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于致命错误，日志系统可能尚未初始化）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for KeepaliveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for KeepaliveError {}

// 便捷的构造函数
impl KeepaliveError {
    pub fn missing_config<T: Into<String>>(msg: T) -> Self {
        KeepaliveError::MissingConfig(msg.into())
    }

    pub fn invalid_config<T: Into<String>>(msg: T) -> Self {
        KeepaliveError::InvalidConfig(msg.into())
    }

    pub fn invalid_redis_url<T: Into<String>>(msg: T) -> Self {
        KeepaliveError::InvalidRedisUrl(msg.into())
    }

    pub fn redis_connection<T: Into<String>>(msg: T) -> Self {
        KeepaliveError::RedisConnection(msg.into())
    }

    pub fn redis_command<T: Into<String>>(msg: T) -> Self {
        KeepaliveError::RedisCommand(msg.into())
    }

    pub fn timeout<T: Into<String>>(msg: T) -> Self {
        KeepaliveError::Timeout(msg.into())
    }

    pub fn store_closed<T: Into<String>>(msg: T) -> Self {
        KeepaliveError::StoreClosed(msg.into())
    }

    pub fn signal_operation<T: Into<String>>(msg: T) -> Self {
        KeepaliveError::SignalOperation(msg.into())
    }

    pub fn logging<T: Into<String>>(msg: T) -> Self {
        KeepaliveError::Logging(msg.into())
    }
}

impl From<redis::RedisError> for KeepaliveError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_connection_refusal() || err.is_connection_dropped() || err.is_io_error() {
            KeepaliveError::RedisConnection(err.to_string())
        } else {
            KeepaliveError::RedisCommand(err.to_string())
        }
    }
}

impl From<config::ConfigError> for KeepaliveError {
    fn from(err: config::ConfigError) -> Self {
        KeepaliveError::InvalidConfig(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, KeepaliveError>;
