//! Environment variable secret store provider
//!
//! Resolves a secret `name` to the variable `<prefix><NAME>`, where `NAME`
//! is upper-cased with `-` and `.` replaced by `_`.
//!
//! ```toml
//! [providers.secrets.instances.default]
//! prefix = "APP_SECRET_"
//! ```
//!
//! With that configuration `get_secret("db-password")` reads
//! `APP_SECRET_DB_PASSWORD`.

use crate::constants::{SECRETS_ENV_NAME, SECRETS_SECTION};
use async_trait::async_trait;
use pab_domain::error::{Error, Result};
use pab_domain::ports::providers::SecretStore;
use pab_domain::{InstanceSettings, ProviderInstances, ProviderKind, ProviderMarker};
use pab_infrastructure::di::registry::{PROVIDER_MODULES, ProviderEntry, register_section};
use pab_infrastructure::di::{InstanceRegistration, ProviderModule, ServiceCollection};
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;

/// Settings of one environment secret store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvSecretsSettings {
    /// Prefix of the environment variables holding secrets
    pub prefix: String,
}

impl InstanceSettings for EnvSecretsSettings {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.prefix.is_empty() {
            return Err("prefix cannot be empty".to_string());
        }
        if self.prefix.contains('=') || self.prefix.contains('\0') {
            return Err("prefix cannot contain '=' or NUL".to_string());
        }
        Ok(())
    }
}

/// Secret store reading prefixed environment variables
#[derive(Debug, Clone)]
pub struct EnvSecretStore {
    prefix: String,
}

impl EnvSecretStore {
    /// Create a store reading variables starting with `prefix`
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Variable prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Environment variable backing the secret `name`
    pub fn variable_name(&self, name: &str) -> Result<String> {
        if name.is_empty() {
            return Err(Error::invalid_argument("Secret name cannot be empty"));
        }
        if name.contains('=') || name.contains('\0') {
            return Err(Error::invalid_argument(format!(
                "Secret name '{name}' contains an invalid character"
            )));
        }
        let normalized: String = name
            .chars()
            .map(|c| match c {
                '-' | '.' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect();
        Ok(format!("{}{}", self.prefix, normalized))
    }
}

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn get_secret(&self, name: &str) -> Result<Option<String>> {
        let variable = self.variable_name(name)?;
        match env::var(&variable) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => Err(Error::configuration(format!(
                "Secret variable {variable} is not valid unicode"
            ))),
        }
    }

    fn provider_name(&self) -> &str {
        SECRETS_ENV_NAME
    }
}

/// Registers one [`EnvSecretStore`] per configured instance
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecretsModule;

impl EnvSecretsModule {
    /// Marker recorded once the module is registered
    pub const MARKER: ProviderMarker = ProviderMarker::new(ProviderKind::Secrets, SECRETS_ENV_NAME);
}

impl ProviderModule for EnvSecretsModule {
    type Settings = ProviderInstances<EnvSecretsSettings>;

    fn marker(&self) -> ProviderMarker {
        Self::MARKER
    }

    fn register_instance(
        &self,
        services: &ServiceCollection,
        instance: &InstanceRegistration<'_, EnvSecretsSettings>,
    ) -> Result<()> {
        let store: Arc<dyn SecretStore> = Arc::new(EnvSecretStore::new(&instance.settings.prefix));
        instance.add_service(services, store)
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

#[linkme::distributed_slice(PROVIDER_MODULES)]
static ENV_SECRETS: ProviderEntry = ProviderEntry {
    marker: EnvSecretsModule::MARKER,
    section: SECRETS_SECTION,
    description: "Secrets read from prefixed environment variables",
    register: |services, context, config| {
        register_section(&EnvSecretsModule, SECRETS_SECTION, services, context, config)
    },
};
