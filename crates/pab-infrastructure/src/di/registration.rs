//! Provider registration helpers
//!
//! A provider module describes how to wire one provider into a
//! [`ServiceCollection`]. [`ProviderRegistrationExt::add_provider`] runs the
//! module against its settings:
//!
//! 1. reject settings without instances
//! 2. validate every instance (nothing is registered if one is invalid)
//! 3. reserve the provider marker in the registration tracker
//! 4. register shared services, then each instance in name order, into a
//!    staging collection
//! 5. move the staged services into the collection and record the marker
//!
//! A failure in step 4 leaves the collection untouched and releases the
//! marker, so the provider can be registered again.

use crate::di::container::{ServiceCollection, ServiceKey};
use crate::di::context::ProviderContext;
use crate::di::tracker::{RegistrationTracker, RegistrationTrackerExt};
use pab_domain::constants::{DEFAULT_INSTANCE_NAME, INSTANCE_KEY_SEPARATOR};
use pab_domain::error::{Error, Result};
use pab_domain::ports::settings::validate_instances;
use pab_domain::{AuthScheme, ProviderMarker, ProviderSettings};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Instance settings type of a provider module
pub type InstanceOf<M> = <<M as ProviderModule>::Settings as ProviderSettings>::Instance;

/// A pluggable provider that knows how to register its services
///
/// The `services` passed to the hooks stage the provider's own
/// registrations; services of the host are not visible through them.
pub trait ProviderModule: Send + Sync {
    /// Settings bound from the provider's configuration section
    type Settings: ProviderSettings;

    /// Identity recorded in the registration tracker
    fn marker(&self) -> ProviderMarker;

    /// Register services shared by all instances; runs once per collection
    fn register_shared(&self, _services: &ServiceCollection, _context: &ProviderContext) -> Result<()> {
        Ok(())
    }

    /// Register the services of one named instance
    fn register_instance(
        &self,
        services: &ServiceCollection,
        instance: &InstanceRegistration<'_, InstanceOf<Self>>,
    ) -> Result<()>;
}

/// Everything a provider needs to register one named instance
#[derive(Debug)]
pub struct InstanceRegistration<'a, I> {
    /// Instance name from configuration
    pub name: &'a str,
    /// Validated instance settings
    pub settings: &'a I,
    /// Startup context
    pub context: &'a ProviderContext,
    /// Whether this instance also backs the unnamed service
    ///
    /// True for the instance named `default`, or for the only instance.
    pub is_default: bool,
}

impl<I> InstanceRegistration<'_, I> {
    /// Register `service` under the instance name, and unnamed when default
    pub fn add_service<T: ?Sized + Send + Sync + 'static>(
        &self,
        services: &ServiceCollection,
        service: Arc<T>,
    ) -> Result<()> {
        if self.is_default {
            services.add_singleton::<T>(service.clone())?;
        }
        services.add_keyed_singleton::<T>(self.name, service)
    }
}

/// Diagnostic record of one registered provider instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredInstance {
    /// Provider marker
    pub marker: ProviderMarker,
    /// Instance name
    pub instance: String,
    /// Authentication scheme the instance was registered with
    pub auth_scheme: AuthScheme,
    /// Whether the instance also backs the unnamed service
    pub is_default: bool,
}

impl RegisteredInstance {
    /// Key under which the record is stored: `<marker>/<instance>`
    pub fn key(&self) -> String {
        format!("{}{}{}", self.marker, INSTANCE_KEY_SEPARATOR, self.instance)
    }
}

/// Provider registration operations on a [`ServiceCollection`]
pub trait ProviderRegistrationExt {
    /// Register a provider module with its settings
    ///
    /// Returns `Ok(false)` without touching the collection when the
    /// provider's marker was already claimed, by an earlier call or by a
    /// concurrent one.
    fn add_provider<M: ProviderModule>(
        &self,
        module: &M,
        context: &ProviderContext,
        settings: &M::Settings,
    ) -> Result<bool>;

    /// All registered provider instances, sorted by marker then instance
    fn registered_instances(&self) -> Vec<RegisteredInstance>;
}

impl ProviderRegistrationExt for ServiceCollection {
    fn add_provider<M: ProviderModule>(
        &self,
        module: &M,
        context: &ProviderContext,
        settings: &M::Settings,
    ) -> Result<bool> {
        let marker = module.marker();
        let instances = settings.instances();
        if instances.is_empty() {
            return Err(Error::configuration(format!(
                "Provider {marker} declares no instances"
            )));
        }
        validate_instances(&marker.to_string(), settings)?;

        let Some(reservation) = self.reserve_registration(marker.clone())? else {
            debug!(marker = %marker, "Provider already registered, skipping");
            return Ok(false);
        };

        let staged = ServiceCollection::new();
        if let Err(err) = stage_provider(&staged, module, context, settings) {
            warn!(marker = %marker, error = %err, "Provider registration failed, nothing registered");
            return Err(err);
        }
        self.absorb(staged)?;
        reservation.commit();

        info!(
            marker = %marker,
            instances = instances.len(),
            runtime_type = %context.runtime_type(),
            "Registered provider"
        );
        Ok(true)
    }

    fn registered_instances(&self) -> Vec<RegisteredInstance> {
        let mut records: Vec<RegisteredInstance> = self
            .keyed_singletons::<RegisteredInstance>()
            .into_iter()
            .map(|(_, record)| (*record).clone())
            .collect();
        records.sort_by(|a, b| (&a.marker, &a.instance).cmp(&(&b.marker, &b.instance)));
        records
    }
}

/// Run the module's hooks against `staged`
fn stage_provider<M: ProviderModule>(
    staged: &ServiceCollection,
    module: &M,
    context: &ProviderContext,
    settings: &M::Settings,
) -> Result<()> {
    let marker = module.marker();
    module.register_shared(staged, context)?;

    let instances = settings.instances();
    let single = instances.len() == 1;
    let has_named_default = instances.contains_key(DEFAULT_INSTANCE_NAME);
    for (name, instance_settings) in instances {
        let is_default = name == DEFAULT_INSTANCE_NAME || (single && !has_named_default);
        let instance = InstanceRegistration {
            name,
            settings: instance_settings,
            context,
            is_default,
        };
        module.register_instance(staged, &instance)?;

        let record = RegisteredInstance {
            marker: marker.clone(),
            instance: name.clone(),
            auth_scheme: context.auth_scheme(),
            is_default,
        };
        staged.add_keyed_singleton(record.key(), Arc::new(record))?;
        debug!(marker = %marker, instance = %name, is_default, "Registered provider instance");
    }
    Ok(())
}

impl ServiceCollection {
    /// Move the registrations of `staged` into this collection
    ///
    /// Markers recorded in a staged tracker, by providers registered from
    /// within another provider, are recorded here too.
    fn absorb(&self, staged: ServiceCollection) -> Result<()> {
        let tracker_key = ServiceKey::of::<RegistrationTracker>();
        for descriptor in staged.into_descriptors() {
            if *descriptor.key() != tracker_key {
                self.insert(descriptor)?;
                continue;
            }
            if let Some(nested) = descriptor.instance_of::<RegistrationTracker>() {
                for marker in nested.markers() {
                    self.mark_registered(marker)?;
                }
            }
        }
        Ok(())
    }
}
