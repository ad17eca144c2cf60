//! Configuration types
//!
//! ```toml
//! [logging]
//! level = "debug"
//! json_format = false
//!
//! [runtime]
//! type = "web-api"
//!
//! [providers.storage.instances.primary]
//! container = "uploads"
//! ```

use crate::constants::DEFAULT_LOG_LEVEL;
use pab_domain::RuntimeType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Root application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Hosting runtime configuration
    pub runtime: RuntimeConfig,

    /// Raw provider sections keyed by section name
    ///
    /// Each provider binds its own section into its typed settings; this
    /// map only records which sections are present.
    pub providers: BTreeMap<String, serde_json::Value>,
}

impl AppConfig {
    /// Names of the provider sections present in configuration
    pub fn provider_sections(&self) -> Vec<&str> {
        self.providers.keys().map(String::as_str).collect()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Emit JSON lines instead of human readable output
    pub json_format: bool,

    /// Optional log file; rotated daily
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json_format: false,
            file_output: None,
        }
    }
}

/// Hosting runtime configuration
///
/// When `type` is absent the host must set the runtime type explicitly
/// before bootstrapping providers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Hosting mode of the process
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub runtime_type: Option<RuntimeType>,
}
