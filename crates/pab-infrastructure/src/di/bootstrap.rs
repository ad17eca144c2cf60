//! Host bootstrap
//!
//! Startup sequence of a hosting application:
//!
//! ```text
//! LoadedConfig ─▶ Bootstrap ─┬─ set runtime type (explicit or from config)
//!                            ├─ add ProviderContext singleton
//!                            └─ register configured providers
//!                                        │
//!                                        ▼
//!                                      Host ─ build() ─▶ ServiceProvider
//! ```

use crate::config::LoadedConfig;
use crate::di::container::{ServiceCollection, ServiceProvider};
use crate::di::context::{ProviderContext, RuntimeTypeCell};
use crate::di::registration::{ProviderRegistrationExt, RegisteredInstance};
use crate::di::registry::register_configured_providers;
use pab_domain::error::Result;
use pab_domain::{ProviderMarker, RuntimeType};
use std::sync::Arc;
use tracing::info;

/// Startup builder owning the runtime type slot and the service collection
pub struct Bootstrap {
    config: LoadedConfig,
    runtime: RuntimeTypeCell,
    services: ServiceCollection,
}

impl Bootstrap {
    /// Create a bootstrap for the given configuration
    pub fn new(config: LoadedConfig) -> Self {
        Self {
            config,
            runtime: RuntimeTypeCell::new(),
            services: ServiceCollection::new(),
        }
    }

    /// Set the runtime type explicitly, overriding configuration
    ///
    /// Fails if the runtime type was already set.
    pub fn with_runtime_type(self, runtime_type: RuntimeType) -> Result<Self> {
        self.runtime.set_runtime_type(runtime_type)?;
        Ok(self)
    }

    /// Runtime type slot
    pub fn runtime(&self) -> &RuntimeTypeCell {
        &self.runtime
    }

    /// Service collection, for host services registered before providers
    pub fn services(&self) -> &ServiceCollection {
        &self.services
    }

    /// Configuration being bootstrapped
    pub fn config(&self) -> &LoadedConfig {
        &self.config
    }

    /// Run the startup sequence
    ///
    /// Fails with `Error::RuntimeTypeNotConfigured` when the runtime type was
    /// neither set explicitly nor declared in configuration.
    pub fn init(self) -> Result<Host> {
        if !self.runtime.is_configured() {
            if let Some(runtime_type) = self.config.runtime_type() {
                self.runtime.set_runtime_type(runtime_type)?;
            }
        }
        let context = self.runtime.context()?;
        self.services.add_singleton(Arc::new(context))?;

        let registered = register_configured_providers(&self.services, &context, &self.config)?;

        info!(
            runtime_type = %context.runtime_type(),
            providers = registered.len(),
            services = self.services.len(),
            "Host bootstrapped"
        );

        Ok(Host {
            config: self.config,
            services: self.services,
            context,
            registered,
        })
    }
}

/// Result of a successful bootstrap
pub struct Host {
    config: LoadedConfig,
    services: ServiceCollection,
    context: ProviderContext,
    registered: Vec<ProviderMarker>,
}

impl Host {
    /// Startup context
    pub fn context(&self) -> &ProviderContext {
        &self.context
    }

    /// Service collection, still open for registrations
    pub fn services(&self) -> &ServiceCollection {
        &self.services
    }

    /// Configuration the host was bootstrapped from
    pub fn config(&self) -> &LoadedConfig {
        &self.config
    }

    /// Providers registered during bootstrap, in marker order
    pub fn registered(&self) -> &[ProviderMarker] {
        &self.registered
    }

    /// Registered provider instances
    pub fn registered_instances(&self) -> Vec<RegisteredInstance> {
        self.services.registered_instances()
    }

    /// Freeze the registrations into a resolver
    pub fn build(self) -> ServiceProvider {
        self.services.build()
    }
}
