//! Service container
//!
//! A small two-phase IoC container:
//!
//! ```text
//! ServiceCollection (registration, &self + DashMap)
//!        │ build()
//!        ▼
//! ServiceProvider (resolution, immutable map + lazy singletons)
//! ```
//!
//! Services are keyed by type identity plus an optional instance name, so a
//! provider can register one keyed service per configured instance. Trait
//! objects are first-class: register an `Arc<dyn Port>` with
//! `add_singleton::<dyn Port>(..)` and resolve it with `get::<dyn Port>()`.
//!
//! Registering a key again replaces the previous registration, except for the
//! [`RegistrationTracker`]: once a collection holds one, any attempt to
//! replace it fails with `Error::RegistrationConflict`.

use crate::di::tracker::RegistrationTracker;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use pab_domain::error::{Error, Result};
use serde::Serialize;
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::debug;

type AnyService = Arc<dyn Any + Send + Sync>;
type AnyFactory = Arc<dyn Fn(&ServiceProvider) -> Result<AnyService> + Send + Sync>;

/// How long a resolved service lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceLifetime {
    /// One value shared by every resolution
    Singleton,
    /// A new value per resolution
    Transient,
}

/// Identity of a registration: type plus optional instance name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceKey {
    type_id: TypeId,
    type_name: &'static str,
    name: Option<String>,
}

impl ServiceKey {
    /// Key of the unnamed registration of `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            name: None,
        }
    }

    /// Key of the registration of `T` named `name`
    pub fn keyed<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::of::<T>()
        }
    }

    /// Rust type name of the service
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Instance name, if the registration is keyed
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn is_type<T: ?Sized + 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}[{}]", self.type_name, name),
            None => f.write_str(self.type_name),
        }
    }
}

#[derive(Clone)]
enum Implementation {
    Instance(AnyService),
    Factory(AnyFactory),
}

/// One registration in a [`ServiceCollection`]
#[derive(Clone)]
pub struct ServiceDescriptor {
    key: ServiceKey,
    lifetime: ServiceLifetime,
    implementation: Implementation,
}

impl ServiceDescriptor {
    fn instance<T: ?Sized + Send + Sync + 'static>(key: ServiceKey, value: Arc<T>) -> Self {
        Self {
            key,
            lifetime: ServiceLifetime::Singleton,
            implementation: Implementation::Instance(erase(value)),
        }
    }

    fn factory<T, F>(key: ServiceKey, lifetime: ServiceLifetime, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        let factory: AnyFactory = Arc::new(move |provider| factory(provider).map(erase));
        Self {
            key,
            lifetime,
            implementation: Implementation::Factory(factory),
        }
    }

    /// Registration key
    pub fn key(&self) -> &ServiceKey {
        &self.key
    }

    /// Registration lifetime
    pub fn lifetime(&self) -> ServiceLifetime {
        self.lifetime
    }

    /// Whether the registration holds a ready-made value rather than a factory
    pub fn is_instance(&self) -> bool {
        matches!(self.implementation, Implementation::Instance(_))
    }

    /// The registered value, when this is an instance registration of `T`
    pub(crate) fn instance_of<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        match &self.implementation {
            Implementation::Instance(service) => downcast::<T>(service),
            Implementation::Factory(_) => None,
        }
    }

    fn info(&self) -> ServiceInfo {
        ServiceInfo {
            service: self.key.type_name.to_string(),
            name: self.key.name.clone(),
            lifetime: self.lifetime,
            instance: self.is_instance(),
        }
    }
}

impl fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("key", &self.key)
            .field("lifetime", &self.lifetime)
            .field("instance", &self.is_instance())
            .finish()
    }
}

/// Serializable summary of a registration, for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceInfo {
    /// Rust type name of the service
    pub service: String,
    /// Instance name for keyed registrations
    pub name: Option<String>,
    /// Registration lifetime
    pub lifetime: ServiceLifetime,
    /// Whether a ready-made value is registered (rather than a factory)
    pub instance: bool,
}

fn erase<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> AnyService {
    Arc::new(value)
}

fn downcast<T: ?Sized + Send + Sync + 'static>(service: &AnyService) -> Option<Arc<T>> {
    let any: &(dyn Any + Send + Sync) = service.as_ref();
    any.downcast_ref::<Arc<T>>().cloned()
}

/// Registration phase of the container
///
/// All methods take `&self`, so independent registration routines running
/// on different threads can share one collection.
#[derive(Default)]
pub struct ServiceCollection {
    services: DashMap<ServiceKey, ServiceDescriptor>,
}

impl ServiceCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a singleton value, replacing any previous registration of `T`
    pub fn add_singleton<T: ?Sized + Send + Sync + 'static>(&self, value: Arc<T>) -> Result<()> {
        self.insert(ServiceDescriptor::instance(ServiceKey::of::<T>(), value))
    }

    /// Register a named singleton value, replacing any previous one with that name
    pub fn add_keyed_singleton<T: ?Sized + Send + Sync + 'static>(
        &self,
        name: impl Into<String>,
        value: Arc<T>,
    ) -> Result<()> {
        self.insert(ServiceDescriptor::instance(ServiceKey::keyed::<T>(name), value))
    }

    /// Register a singleton value unless `T` is already registered
    ///
    /// Returns `true` when the value was added.
    pub fn try_add_singleton<T: ?Sized + Send + Sync + 'static>(&self, value: Arc<T>) -> bool {
        self.try_insert(ServiceDescriptor::instance(ServiceKey::of::<T>(), value))
    }

    /// Register a named singleton value unless that name is already registered
    pub fn try_add_keyed_singleton<T: ?Sized + Send + Sync + 'static>(
        &self,
        name: impl Into<String>,
        value: Arc<T>,
    ) -> bool {
        self.try_insert(ServiceDescriptor::instance(ServiceKey::keyed::<T>(name), value))
    }

    /// Register a singleton created on first resolution
    pub fn add_singleton_factory<T, F>(&self, factory: F) -> Result<()>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.insert(ServiceDescriptor::factory(
            ServiceKey::of::<T>(),
            ServiceLifetime::Singleton,
            factory,
        ))
    }

    /// Register a named singleton created on first resolution
    pub fn add_keyed_singleton_factory<T, F>(&self, name: impl Into<String>, factory: F) -> Result<()>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.insert(ServiceDescriptor::factory(
            ServiceKey::keyed::<T>(name),
            ServiceLifetime::Singleton,
            factory,
        ))
    }

    /// Register a service created anew on every resolution
    pub fn add_transient<T, F>(&self, factory: F) -> Result<()>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.insert(ServiceDescriptor::factory(
            ServiceKey::of::<T>(),
            ServiceLifetime::Transient,
            factory,
        ))
    }

    /// Register a named service created anew on every resolution
    pub fn add_keyed_transient<T, F>(&self, name: impl Into<String>, factory: F) -> Result<()>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.insert(ServiceDescriptor::factory(
            ServiceKey::keyed::<T>(name),
            ServiceLifetime::Transient,
            factory,
        ))
    }

    /// Return the singleton instance of `T`, adding the one built by `init` if absent
    ///
    /// The lookup and the insertion happen under the same shard lock, so
    /// concurrent callers always observe a single instance. Fails with
    /// [`Error::RegistrationConflict`] when `T` is registered with a factory
    /// or a transient lifetime, since no shared instance exists then.
    pub fn get_or_add_singleton<T, F>(&self, init: F) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
        F: FnOnce() -> Arc<T>,
    {
        let key = ServiceKey::of::<T>();
        let descriptor = self
            .services
            .entry(key.clone())
            .or_insert_with(|| ServiceDescriptor::instance(key, init()));

        if descriptor.lifetime != ServiceLifetime::Singleton {
            return Err(Error::registration_conflict(
                type_name::<T>(),
                format!(
                    "expected a singleton instance, found a {:?} registration",
                    descriptor.lifetime
                ),
            ));
        }
        descriptor.instance_of::<T>().ok_or_else(|| {
            Error::registration_conflict(
                type_name::<T>(),
                "expected a singleton instance, found a factory registration",
            )
        })
    }

    /// Registered singleton instance of `T`, if any
    ///
    /// Factory registrations are not invoked and yield `None`.
    pub fn get_singleton<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.services
            .get(&ServiceKey::of::<T>())
            .and_then(|descriptor| descriptor.instance_of::<T>())
    }

    /// All named singleton instances of `T`, sorted by name
    pub fn keyed_singletons<T: ?Sized + Send + Sync + 'static>(&self) -> Vec<(String, Arc<T>)> {
        let mut found: Vec<(String, Arc<T>)> = self
            .services
            .iter()
            .filter(|entry| entry.key().is_type::<T>())
            .filter_map(|entry| {
                let name = entry.key().name.clone()?;
                entry.value().instance_of::<T>().map(|value| (name, value))
            })
            .collect();
        found.sort_by(|a, b| a.0.cmp(&b.0));
        found
    }

    /// Whether `T` has an unnamed registration
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.services.contains_key(&ServiceKey::of::<T>())
    }

    /// Whether `T` has a registration named `name`
    pub fn contains_keyed<T: ?Sized + 'static>(&self, name: &str) -> bool {
        self.services.contains_key(&ServiceKey::keyed::<T>(name))
    }

    /// Number of registrations
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Summaries of all registrations, sorted by type then name
    pub fn descriptors(&self) -> Vec<ServiceInfo> {
        let mut infos: Vec<ServiceInfo> = self
            .services
            .iter()
            .map(|entry| entry.value().info())
            .collect();
        infos.sort_by(|a, b| (&a.service, &a.name).cmp(&(&b.service, &b.name)));
        infos
    }

    /// Take every registration out of the collection
    pub(crate) fn into_descriptors(self) -> Vec<ServiceDescriptor> {
        self.services.into_iter().map(|(_, descriptor)| descriptor).collect()
    }

    /// Freeze the registrations into a resolver
    pub fn build(self) -> ServiceProvider {
        let services = self
            .services
            .into_iter()
            .map(|(key, descriptor)| {
                (
                    key,
                    Resolved {
                        descriptor,
                        cache: OnceLock::new(),
                    },
                )
            })
            .collect();
        ServiceProvider { services }
    }

    pub(crate) fn insert(&self, descriptor: ServiceDescriptor) -> Result<()> {
        match self.services.entry(descriptor.key.clone()) {
            Entry::Occupied(mut occupied) => {
                if *occupied.key() == ServiceKey::of::<RegistrationTracker>() {
                    return Err(Error::registration_conflict(
                        occupied.key().type_name(),
                        "the registration tracker of a collection cannot be replaced",
                    ));
                }
                debug!(service = %occupied.key(), "Replaced existing registration");
                occupied.insert(descriptor);
            }
            Entry::Vacant(vacant) => {
                vacant.insert(descriptor);
            }
        }
        Ok(())
    }

    fn try_insert(&self, descriptor: ServiceDescriptor) -> bool {
        match self.services.entry(descriptor.key.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(descriptor);
                true
            }
        }
    }
}

impl fmt::Debug for ServiceCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceCollection")
            .field("services", &self.descriptors())
            .finish()
    }
}

struct Resolved {
    descriptor: ServiceDescriptor,
    cache: OnceLock<AnyService>,
}

/// Resolution phase of the container
///
/// Lazily created singletons keep the first value produced. Under
/// contention a singleton factory may run more than once, but only one
/// value is ever handed out. Factories must not resolve their own key.
pub struct ServiceProvider {
    services: HashMap<ServiceKey, Resolved>,
}

impl ServiceProvider {
    /// Resolve the unnamed registration of `T`
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.resolve(&ServiceKey::of::<T>())
    }

    /// Resolve the registration of `T` named `name`
    pub fn get_keyed<T: ?Sized + Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>> {
        self.resolve(&ServiceKey::keyed::<T>(name))
    }

    /// Resolve `T` if registered
    ///
    /// Returns `Ok(None)` when `T` is not registered; factory failures are
    /// still reported as errors.
    pub fn try_get<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Option<Arc<T>>> {
        let key = ServiceKey::of::<T>();
        if self.services.contains_key(&key) {
            self.resolve(&key).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Resolve every named registration of `T`, sorted by name
    pub fn get_all_keyed<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Vec<(String, Arc<T>)>> {
        let mut names: Vec<&str> = self
            .services
            .keys()
            .filter(|key| key.is_type::<T>())
            .filter_map(ServiceKey::name)
            .collect();
        names.sort_unstable();
        names
            .into_iter()
            .map(|name| Ok((name.to_string(), self.get_keyed::<T>(name)?)))
            .collect()
    }

    /// Whether `T` has an unnamed registration
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.services.contains_key(&ServiceKey::of::<T>())
    }

    /// Whether `T` has a registration named `name`
    pub fn contains_keyed<T: ?Sized + 'static>(&self, name: &str) -> bool {
        self.services.contains_key(&ServiceKey::keyed::<T>(name))
    }

    /// Number of registrations
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    fn resolve<T: ?Sized + Send + Sync + 'static>(&self, key: &ServiceKey) -> Result<Arc<T>> {
        let entry = self
            .services
            .get(key)
            .ok_or_else(|| Error::not_found(format!("service {key}")))?;

        let service = match (&entry.descriptor.implementation, entry.descriptor.lifetime) {
            (Implementation::Instance(service), _) => service.clone(),
            (Implementation::Factory(factory), ServiceLifetime::Singleton) => {
                match entry.cache.get() {
                    Some(service) => service.clone(),
                    None => {
                        let created = factory(self)?;
                        entry.cache.get_or_init(|| created).clone()
                    }
                }
            }
            (Implementation::Factory(factory), ServiceLifetime::Transient) => factory(self)?,
        };

        downcast::<T>(&service)
            .ok_or_else(|| Error::internal(format!("service {key} has an unexpected type")))
    }
}

impl fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceProvider")
            .field("services", &self.services.len())
            .finish()
    }
}
