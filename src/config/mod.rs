//! Configuration loading
//!
//! Sources, lowest priority first:
//! - built-in defaults
//! - `config.toml` in the working directory (optional)
//! - `KEEPALIVE__*` environment variables
//!
//! `REDIS_URL` is read separately and is the only required setting. A `.env`
//! file in the working directory is merged into the process environment
//! before any of this runs.

mod structs;

pub use structs::*;

use std::path::{Path, PathBuf};

use crate::errors::{KeepaliveError, Result};

/// 默认配置文件路径
pub const CONFIG_FILE: &str = "config.toml";

/// 默认 .env 文件路径
pub const DOTENV_FILE: &str = ".env";

/// Result of trying to merge a `.env` file into the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotenvStatus {
    Loaded(PathBuf),
    NotFound,
    Invalid(String),
}

impl DotenvStatus {
    /// The line to report when the file was not usable.
    pub fn warning(&self) -> Option<String> {
        match self {
            DotenvStatus::Loaded(_) => None,
            DotenvStatus::NotFound => Some("Warning: .env file not found".to_string()),
            DotenvStatus::Invalid(e) => {
                Some(format!("Warning: .env file could not be parsed: {}", e))
            }
        }
    }
}

/// 加载 .env 文件（不覆盖已存在的环境变量）
///
/// Logging is usually not up yet when this runs, so the outcome is
/// returned and reported later.
pub fn load_dotenv(path: &Path) -> DotenvStatus {
    match dotenvy::from_path(path) {
        Ok(()) => DotenvStatus::Loaded(path.to_path_buf()),
        Err(e) if e.not_found() => DotenvStatus::NotFound,
        Err(e) => DotenvStatus::Invalid(e.to_string()),
    }
}

/// 应用配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub redis_url: String,
    pub counter: CounterConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load from `config.toml` and the current process environment.
    pub fn load() -> Result<Self> {
        Self::from_sources(Path::new(CONFIG_FILE), std::env::vars().collect())
    }

    pub fn from_sources(path: &Path, env: config::Map<String, String>) -> Result<Self> {
        let redis_url = env
            .get(REDIS_URL_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                KeepaliveError::missing_config(format!("{} not set", REDIS_URL_VAR))
            })?;

        let StaticConfig { counter, logging } = StaticConfig::load_from(path, env)?;

        let config = Self {
            redis_url,
            counter,
            logging,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.counter.validate()?;
        self.logging.validate()
    }
}
