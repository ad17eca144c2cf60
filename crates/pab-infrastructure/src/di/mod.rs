//! Dependency Injection System
//!
//! ```text
//! Bootstrap
//! ├── RuntimeTypeCell      write-once hosting mode
//! ├── ServiceCollection    registrations (+ RegistrationTracker singleton)
//! └── PROVIDER_MODULES     linkme registry of provider modules
//!          │
//!          ▼
//!        Host ─ build() ─▶ ServiceProvider
//! ```

pub mod bootstrap;
pub mod container;
pub mod context;
pub mod registration;
pub mod registry;
pub mod tracker;

pub use bootstrap::{Bootstrap, Host};
pub use container::{ServiceCollection, ServiceInfo, ServiceKey, ServiceLifetime, ServiceProvider};
pub use context::{ProviderContext, RuntimeTypeCell};
pub use registration::{
    InstanceOf, InstanceRegistration, ProviderModule, ProviderRegistrationExt, RegisteredInstance,
};
pub use registry::{
    PROVIDER_MODULES, ProviderEntry, find_provider, find_provider_by_section, list_providers,
    register_configured_providers, register_section,
};
pub use tracker::{MarkerReservation, RegistrationTracker, RegistrationTrackerExt};
