//! Infrastructure layer constants
//!
//! Domain-level names are defined in `pab_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "pab.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "pab";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "PAB";

/// Separator between nested keys in environment variables (`PAB__RUNTIME__TYPE`)
pub const CONFIG_ENV_SEPARATOR: &str = "__";

/// Top-level configuration key holding provider sections
pub const PROVIDERS_CONFIG_KEY: &str = "providers";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "PAB_LOG";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log file name used when `file_output` has no file name, such as `..`
pub const DEFAULT_LOG_FILE_NAME: &str = "pab.log";
