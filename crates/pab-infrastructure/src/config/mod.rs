//! Configuration management
//!
//! Configuration is assembled with Figment from defaults, an optional TOML
//! file and `PAB__`-prefixed environment variables.

pub mod loader;
pub mod types;

pub use loader::{ConfigBuilder, ConfigLoader, LoadedConfig};
pub use types::{AppConfig, LoggingConfig, RuntimeConfig};
