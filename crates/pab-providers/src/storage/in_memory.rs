//! In-memory blob storage provider
//!
//! Stores blobs in a concurrent map, one map per configured instance.
//! Data is not persisted and will be lost on restart.
//!
//! ```toml
//! [providers.storage.instances.default]
//! container = "uploads"
//! max_blob_bytes = 1048576
//! ```

use crate::constants::{STORAGE_IN_MEMORY_NAME, STORAGE_SECTION};
use async_trait::async_trait;
use dashmap::DashMap;
use pab_domain::error::{Error, Result};
use pab_domain::ports::providers::BlobStorage;
use pab_domain::{InstanceSettings, ProviderInstances, ProviderKind, ProviderMarker};
use pab_infrastructure::di::registry::{PROVIDER_MODULES, ProviderEntry, register_section};
use pab_infrastructure::di::{InstanceRegistration, ProviderModule, ServiceCollection};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Settings of one in-memory storage instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryStorageSettings {
    /// Container name reported by the instance
    pub container: String,

    /// Largest accepted blob; unlimited when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_blob_bytes: Option<usize>,
}

impl InMemoryStorageSettings {
    /// Settings for `container` without a size limit
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            max_blob_bytes: None,
        }
    }
}

impl InstanceSettings for InMemoryStorageSettings {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.container.trim().is_empty() {
            return Err("container cannot be empty".to_string());
        }
        if self.max_blob_bytes == Some(0) {
            return Err("max_blob_bytes must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// In-memory blob storage
pub struct InMemoryBlobStorage {
    container: String,
    max_blob_bytes: Option<usize>,
    blobs: DashMap<String, Vec<u8>>,
}

impl InMemoryBlobStorage {
    /// Create an empty storage bound to `container`
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            max_blob_bytes: None,
            blobs: DashMap::new(),
        }
    }

    /// Create an empty storage from instance settings
    pub fn from_settings(settings: &InMemoryStorageSettings) -> Self {
        Self {
            max_blob_bytes: settings.max_blob_bytes,
            ..Self::new(settings.container.clone())
        }
    }

    /// Number of stored blobs
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Whether no blob is stored
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    fn check_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::invalid_argument("Blob name cannot be empty"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryBlobStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlobStorage")
            .field("container", &self.container)
            .field("max_blob_bytes", &self.max_blob_bytes)
            .field("blobs", &self.blobs.len())
            .finish()
    }
}

#[async_trait]
impl BlobStorage for InMemoryBlobStorage {
    async fn put(&self, name: &str, data: Vec<u8>) -> Result<()> {
        Self::check_name(name)?;
        if let Some(limit) = self.max_blob_bytes
            && data.len() > limit
        {
            return Err(Error::invalid_argument(format!(
                "Blob '{name}' is {} bytes, limit for container '{}' is {limit}",
                data.len(),
                self.container
            )));
        }
        debug!(container = %self.container, blob = name, bytes = data.len(), "Stored blob");
        self.blobs.insert(name.to_string(), data);
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>> {
        Self::check_name(name)?;
        Ok(self.blobs.get(name).map(|blob| blob.value().clone()))
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        Self::check_name(name)?;
        Ok(self.blobs.remove(name).is_some())
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        Self::check_name(name)?;
        Ok(self.blobs.contains_key(name))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .blobs
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        Ok(names)
    }

    fn container(&self) -> &str {
        &self.container
    }

    fn provider_name(&self) -> &str {
        STORAGE_IN_MEMORY_NAME
    }
}

/// Registers one [`InMemoryBlobStorage`] per configured instance
#[derive(Debug, Default, Clone, Copy)]
pub struct InMemoryStorageModule;

impl InMemoryStorageModule {
    /// Marker recorded once the module is registered
    pub const MARKER: ProviderMarker =
        ProviderMarker::new(ProviderKind::Storage, STORAGE_IN_MEMORY_NAME);
}

impl ProviderModule for InMemoryStorageModule {
    type Settings = ProviderInstances<InMemoryStorageSettings>;

    fn marker(&self) -> ProviderMarker {
        Self::MARKER
    }

    fn register_instance(
        &self,
        services: &ServiceCollection,
        instance: &InstanceRegistration<'_, InMemoryStorageSettings>,
    ) -> Result<()> {
        let storage: Arc<dyn BlobStorage> =
            Arc::new(InMemoryBlobStorage::from_settings(instance.settings));
        instance.add_service(services, storage)
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

#[linkme::distributed_slice(PROVIDER_MODULES)]
static IN_MEMORY_STORAGE: ProviderEntry = ProviderEntry {
    marker: InMemoryStorageModule::MARKER,
    section: STORAGE_SECTION,
    description: "In-memory blob storage (fast, non-persistent)",
    register: |services, context, config| {
        register_section(&InMemoryStorageModule, STORAGE_SECTION, services, context, config)
    },
};
