//! Provider settings contracts
//!
//! Every provider section in configuration has the same shape:
//!
//! ```toml
//! [providers.storage.instances.primary]
//! container = "uploads"
//!
//! [providers.storage.instances.archive]
//! container = "archive"
//! ```
//!
//! A provider declares the settings of one instance by implementing
//! [`InstanceSettings`]; [`ProviderInstances`] wraps them into the
//! per-section map and implements [`ProviderSettings`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;

/// Settings of one named provider instance
pub trait InstanceSettings: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    /// Check the settings before anything is registered
    ///
    /// Return a human readable reason as `Err` to reject the instance.
    fn validate(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

/// Settings of a whole provider: a map of instance name to instance settings
pub trait ProviderSettings: DeserializeOwned + Send + Sync + 'static {
    /// Settings type of each named instance
    type Instance: InstanceSettings;

    /// Named instances, ordered by name
    fn instances(&self) -> &BTreeMap<String, Self::Instance>;

    /// Look up one instance by name
    fn instance(&self, name: &str) -> Option<&Self::Instance> {
        self.instances().get(name)
    }
}

/// Generic `{ instances: { <name>: T } }` provider section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned", serialize = "T: Serialize"))]
pub struct ProviderInstances<T> {
    /// Named instances
    #[serde(rename = "instances", alias = "Instances", default)]
    pub instances: BTreeMap<String, T>,
}

impl<T> ProviderInstances<T> {
    /// Create an empty section
    pub fn new() -> Self {
        Self {
            instances: BTreeMap::new(),
        }
    }

    /// Add a named instance
    pub fn with_instance<S: Into<String>>(mut self, name: S, settings: T) -> Self {
        self.instances.insert(name.into(), settings);
        self
    }

    /// Number of configured instances
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether no instance is configured
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl<T> Default for ProviderInstances<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: InstanceSettings> ProviderSettings for ProviderInstances<T> {
    type Instance = T;

    fn instances(&self) -> &BTreeMap<String, T> {
        &self.instances
    }
}

/// Validate every instance of a provider, stopping at the first rejection
///
/// Instances are checked in name order, so the reported instance is
/// deterministic for a given configuration.
pub fn validate_instances<S: ProviderSettings>(provider: &str, settings: &S) -> Result<()> {
    for (name, instance) in settings.instances() {
        instance
            .validate()
            .map_err(|message| crate::error::Error::validation(provider, name, message))?;
    }
    Ok(())
}
