//! Provider Registry System
//!
//! Provider crates register their modules at link time with `linkme`:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ 1. Provider defines: #[linkme::distributed_slice(PROVIDER_MODULES)]
//! │                      static ENTRY: ProviderEntry = ...       │
//! │ 2. Registry declares PROVIDER_MODULES                         │
//! │ 3. Bootstrap queries PROVIDER_MODULES.iter()                  │
//! │ 4. Config selects:   [providers.storage] → storage entry      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Registering a Provider
//!
//! ```ignore
//! use pab_infrastructure::di::registry::{register_section, ProviderEntry, PROVIDER_MODULES};
//!
//! #[linkme::distributed_slice(PROVIDER_MODULES)]
//! static IN_MEMORY_STORAGE: ProviderEntry = ProviderEntry {
//!     marker: InMemoryStorageModule::MARKER,
//!     section: "storage",
//!     description: "In-memory blob storage",
//!     register: |services, context, config| {
//!         register_section(&InMemoryStorageModule, "storage", services, context, config)
//!     },
//! };
//! ```

use crate::config::LoadedConfig;
use crate::di::container::ServiceCollection;
use crate::di::context::ProviderContext;
use crate::di::registration::{ProviderModule, ProviderRegistrationExt};
use pab_domain::ProviderMarker;
use pab_domain::error::Result;
use std::collections::HashSet;
use tracing::{info, warn};

/// Registry entry for a provider module
pub struct ProviderEntry {
    /// Provider marker
    pub marker: ProviderMarker,
    /// Name of the configuration section under `providers`
    pub section: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Bind the section and register the provider; `Ok(false)` if already registered
    pub register: fn(&ServiceCollection, &ProviderContext, &LoadedConfig) -> Result<bool>,
}

impl std::fmt::Debug for ProviderEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderEntry")
            .field("marker", &self.marker)
            .field("section", &self.section)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

// Auto-collection via linkme distributed slices - providers submit entries at link time
#[linkme::distributed_slice]
pub static PROVIDER_MODULES: [ProviderEntry] = [..];

/// Bind `section` into the module's settings and register it
///
/// Helper for the `register` function of a [`ProviderEntry`].
pub fn register_section<M: ProviderModule>(
    module: &M,
    section: &str,
    services: &ServiceCollection,
    context: &ProviderContext,
    config: &LoadedConfig,
) -> Result<bool> {
    let settings: M::Settings = config.provider_settings(section)?;
    services.add_provider(module, context, &settings)
}

/// All registry entries, sorted by marker
pub fn provider_entries() -> Vec<&'static ProviderEntry> {
    let mut entries: Vec<&'static ProviderEntry> = PROVIDER_MODULES.iter().collect();
    entries.sort_by(|a, b| a.marker.cmp(&b.marker));
    entries
}

/// List all registered provider modules
///
/// Returns `(marker, section, description)` tuples sorted by marker.
/// Useful for CLI help and diagnostics.
pub fn list_providers() -> Vec<(ProviderMarker, &'static str, &'static str)> {
    provider_entries()
        .into_iter()
        .map(|entry| (entry.marker.clone(), entry.section, entry.description))
        .collect()
}

/// Find a provider module by marker
pub fn find_provider(marker: &ProviderMarker) -> Option<&'static ProviderEntry> {
    PROVIDER_MODULES.iter().find(|entry| &entry.marker == marker)
}

/// Find the provider module bound to a configuration section
pub fn find_provider_by_section(section: &str) -> Option<&'static ProviderEntry> {
    PROVIDER_MODULES.iter().find(|entry| entry.section == section)
}

/// Register every provider whose section is present in configuration
///
/// Returns the markers registered by this call, in marker order. Providers
/// that were already registered in `services` are skipped. Sections without
/// a matching provider are logged and ignored.
pub fn register_configured_providers(
    services: &ServiceCollection,
    context: &ProviderContext,
    config: &LoadedConfig,
) -> Result<Vec<ProviderMarker>> {
    register_entries(&provider_entries(), services, context, config)
}

/// Register the given entries whose sections are present in configuration
pub fn register_entries(
    entries: &[&ProviderEntry],
    services: &ServiceCollection,
    context: &ProviderContext,
    config: &LoadedConfig,
) -> Result<Vec<ProviderMarker>> {
    let known: HashSet<&str> = entries.iter().map(|entry| entry.section).collect();
    for section in config.provider_sections() {
        if !known.contains(section) {
            warn!(section, "No provider module is bound to configuration section");
        }
    }

    let mut registered = Vec::new();
    for entry in entries {
        if !config.has_provider_section(entry.section) {
            continue;
        }
        if (entry.register)(services, context, config)? {
            registered.push(entry.marker.clone());
        }
    }

    info!(count = registered.len(), "Registered configured providers");
    Ok(registered)
}
