use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use crate::config::{AppConfig, DOTENV_FILE, DotenvStatus, load_dotenv};
use crate::errors::Result;
use crate::store::{CounterStore, RedisCounterStore};
use crate::system::init_logging;

/// Everything the process builds once at startup and hands down explicitly.
pub struct StartupContext {
    pub config: AppConfig,
    pub store: Arc<dyn CounterStore>,
    /// 必须存活到进程退出，否则缓冲的日志会丢失
    pub log_guard: WorkerGuard,
}

/// 准备启动上下文：.env、配置、日志、存储
///
/// Any error returned here is fatal.
pub fn prepare_startup() -> Result<StartupContext> {
    let dotenv = load_dotenv(Path::new(DOTENV_FILE));
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            // 日志尚未初始化，警告直接输出到 stderr，先于致命错误
            if let Some(warning) = dotenv.warning() {
                eprintln!("{}", warning);
            }
            return Err(e);
        }
    };
    let log_guard = init_logging(&config.logging)?;

    if let DotenvStatus::Loaded(path) = &dotenv {
        debug!("Environment loaded from {}", path.display());
    } else if let Some(warning) = dotenv.warning() {
        warn!("{}", warning);
    }

    // rediss:// 需要 rustls crypto provider
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    let store = RedisCounterStore::open(&config.redis_url)?;
    info!(
        "Using counter store: {} at {}",
        store.backend_name(),
        store.display_url()
    );

    Ok(StartupContext {
        config,
        store: Arc::new(store),
        log_guard,
    })
}
