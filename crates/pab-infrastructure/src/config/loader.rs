//! Configuration loader
//!
//! Handles loading configuration from TOML files, environment variables
//! and default values, and binding provider sections into typed settings.

use crate::config::AppConfig;
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
    PROVIDERS_CONFIG_KEY,
};
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use pab_domain::constants::{INSTANCES_KEY, INSTANCES_KEY_ALIAS};
use pab_domain::error::{Error, Result};
use pab_domain::{ProviderSettings, RuntimeType};
use std::env;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Configuration loader service
#[derive(Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Configuration sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (explicit path, or the first default location found)
    /// 3. Environment variables with prefix (e.g., `PAB__RUNTIME__TYPE`)
    pub fn load(&self) -> Result<LoadedConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        let source = match &self.config_path {
            Some(config_path) if config_path.exists() => {
                log_config_loaded(config_path, true);
                Some(config_path.clone())
            }
            Some(config_path) => {
                log_config_loaded(config_path, false);
                None
            }
            None => Self::find_default_config_path(),
        };
        if let Some(path) = &source {
            figment = figment.merge(Toml::file(path));
        }

        let env_prefix = format!("{}{}", self.env_prefix, CONFIG_ENV_SEPARATOR);
        figment = figment.merge(Env::prefixed(&env_prefix).split(CONFIG_ENV_SEPARATOR));

        let app: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app)?;

        Ok(LoadedConfig {
            app,
            figment,
            source,
        })
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).config_context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).io_context("Failed to write config file")?;

        Ok(())
    }

    /// Get the configured file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Find the first existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            Some(current_dir.join(DEFAULT_CONFIG_FILENAME)),
            Some(
                current_dir
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME),
            ),
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
        ];

        let found = candidates.into_iter().flatten().find(|path| path.exists());
        if let Some(path) = &found {
            log_config_loaded(path, true);
        }
        found
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate application configuration
fn validate_app_config(config: &AppConfig) -> Result<()> {
    parse_log_level(&config.logging.level)?;
    for (section, value) in &config.providers {
        let Some(table) = value.as_object() else {
            return Err(Error::configuration(format!(
                "Provider section '{section}' must be a table"
            )));
        };
        if !table.contains_key(INSTANCES_KEY) && !table.contains_key(INSTANCES_KEY_ALIAS) {
            warn!(section = %section, "Provider section declares no instances");
        }
    }
    Ok(())
}

/// Configuration loaded from all sources
///
/// Keeps the merged Figment so each provider can bind its own section into
/// its typed settings after the application config has been extracted.
#[derive(Clone)]
pub struct LoadedConfig {
    app: AppConfig,
    figment: Figment,
    source: Option<PathBuf>,
}

impl LoadedConfig {
    /// Wrap an in-memory configuration
    pub fn from_app_config(app: AppConfig) -> Self {
        let figment = Figment::new().merge(Serialized::defaults(&app));
        Self {
            app,
            figment,
            source: None,
        }
    }

    /// Application configuration
    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    /// File the configuration was read from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Runtime type declared in configuration, if any
    pub fn runtime_type(&self) -> Option<RuntimeType> {
        self.app.runtime.runtime_type
    }

    /// Whether a provider section is present
    pub fn has_provider_section(&self, section: &str) -> bool {
        self.app.providers.contains_key(section)
    }

    /// Names of the provider sections present in configuration
    pub fn provider_sections(&self) -> Vec<&str> {
        self.app.provider_sections()
    }

    /// Bind a provider section into its typed settings
    pub fn provider_settings<S: ProviderSettings>(&self, section: &str) -> Result<S> {
        if !self.has_provider_section(section) {
            return Err(Error::configuration(format!(
                "Provider section '{PROVIDERS_CONFIG_KEY}.{section}' is missing"
            )));
        }
        let path = format!("{PROVIDERS_CONFIG_KEY}.{section}");
        self.figment
            .extract_inner::<S>(&path)
            .config_context(format!("Invalid provider section '{path}'"))
    }
}

impl std::fmt::Debug for LoadedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedConfig")
            .field("app", &self.app)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Configuration builder for programmatic configuration
pub struct ConfigBuilder {
    config: AppConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with defaults
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Set logging configuration
    pub fn with_logging(mut self, logging: crate::config::LoggingConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Set the runtime type
    pub fn with_runtime_type(mut self, runtime_type: RuntimeType) -> Self {
        self.config.runtime.runtime_type = Some(runtime_type);
        self
    }

    /// Add a provider section from any serializable settings value
    pub fn with_provider_section<S: serde::Serialize>(
        mut self,
        section: impl Into<String>,
        settings: &S,
    ) -> Result<Self> {
        let value = serde_json::to_value(settings)?;
        self.config.providers.insert(section.into(), value);
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> AppConfig {
        self.config
    }

    /// Build the configuration wrapped for provider binding
    pub fn build_loaded(self) -> LoadedConfig {
        LoadedConfig::from_app_config(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
