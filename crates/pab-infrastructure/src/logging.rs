//! Structured logging with tracing
//!
//! Installs a `tracing-subscriber` registry with an env-overridable filter,
//! plain or JSON output on stderr and an optional daily-rolling log file.

use pab_domain::error::{Error, Result};

pub use crate::config::LoggingConfig;
use crate::constants::{DEFAULT_LOG_FILE_NAME, LOG_FILTER_ENV};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Initialize logging with the provided configuration
///
/// Fails if the level is invalid or if a global subscriber is already
/// installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let level = parse_log_level(&config.level)?;
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file_appender = config.file_output.as_deref().map(|path| {
        let (directory, prefix) = log_file_location(path);
        tracing_appender::rolling::daily(directory, prefix)
    });

    // Layer types differ between JSON and plain output, hence the branches
    let installed = if config.json_format {
        let console = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(true);
        let registry = Registry::default().with(filter);
        if let Some(appender) = file_appender {
            let file = fmt::layer()
                .json()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true);
            registry.with(console).with(file).try_init()
        } else {
            registry.with(console).try_init()
        }
    } else {
        let console = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(true);
        let registry = Registry::default().with(filter);
        if let Some(appender) = file_appender {
            let file = fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true);
            registry.with(console).with(file).try_init()
        } else {
            registry.with(console).try_init()
        }
    };
    installed.map_err(|e| Error::configuration_with_source("Failed to install log subscriber", e))?;

    info!("Logging initialized with level: {}", level);
    Ok(())
}

/// Directory and file name prefix of the rolling log file for `path`
///
/// The daily appender appends `.<date>` to the prefix, so `logs/pab.log`
/// rolls into `logs/pab.log.2026-01-31`.
pub fn log_file_location(path: &Path) -> (&Path, &OsStr) {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = path
        .file_name()
        .unwrap_or_else(|| OsStr::new(DEFAULT_LOG_FILE_NAME));
    (directory, prefix)
}

/// Parse log level string to tracing Level
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(Error::configuration(format!(
            "Invalid log level: {level}. Use trace, debug, info, warn, or error"
        ))),
    }
}

/// Log configuration loading status
pub fn log_config_loaded(config_path: &Path, success: bool) {
    if success {
        info!("Configuration loaded from {}", config_path.display());
    } else {
        warn!("Configuration file not found: {}", config_path.display());
    }
}
