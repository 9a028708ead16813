//! Logging system initialization
//!
//! This module provides functions to initialize the tracing/logging system
//! based on application configuration.

use crate::config::LoggingConfig;
use crate::errors::{KeepaliveError, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;

const DEFAULT_LOG_FILE: &str = "keepalive.log";

/// Initialize logging system based on configuration
///
/// Output goes to stdout unless `logging.file` is set; a file is either
/// appended to or rotated daily depending on `logging.enable_rotation`.
///
/// **Note**: Call once, after the configuration has been loaded.
///
/// # Returns
/// * `WorkerGuard` - Must be kept alive for the duration of the program
///   to ensure non-blocking log writes are flushed
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let writer = make_writer(config)?;

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level).map_err(|e| {
        KeepaliveError::logging(format!("Invalid log level '{}': {}", config.level, e))
    })?;

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(logs_to_console(config));

    let installed = if config.format == "json" {
        subscriber_builder.json().try_init()
    } else {
        subscriber_builder.try_init()
    };
    installed.map_err(|e| KeepaliveError::logging(format!("Failed to install subscriber: {}", e)))?;

    Ok(guard)
}

fn logs_to_console(config: &LoggingConfig) -> bool {
    config.file.as_ref().is_none_or(|f| f.is_empty())
}

fn make_writer(config: &LoggingConfig) -> Result<Box<dyn std::io::Write + Send + Sync>> {
    let log_file = match config.file.as_deref() {
        Some(f) if !f.is_empty() => f,
        _ => return Ok(Box::new(std::io::stdout())),
    };

    if config.enable_rotation {
        let path = std::path::Path::new(log_file);
        let dir = path.parent().unwrap_or(std::path::Path::new("."));
        let filename = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or(DEFAULT_LOG_FILE);
        let appender = rolling::Builder::new()
            .rotation(rolling::Rotation::DAILY)
            .filename_prefix(filename.trim_end_matches(".log"))
            .filename_suffix("log")
            .max_log_files(config.max_backups as usize)
            .build(dir)
            .map_err(|e| {
                KeepaliveError::logging(format!("Failed to create rolling log appender: {}", e))
            })?;
        Ok(Box::new(appender))
    } else {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)
            .map_err(|e| {
                KeepaliveError::logging(format!("Failed to open log file '{}': {}", log_file, e))
            })?;
        Ok(Box::new(file))
    }
}
