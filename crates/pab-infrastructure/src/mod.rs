//! # Infrastructure Layer
//!
//! Technical plumbing that lets provider modules register themselves into a
//! host application.
//!
//! ## Module Categories
//!
//! ### Configuration & DI
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment based configuration (TOML + env) |
//! | [`di`] | Service container, registration tracker, runtime context, provider registry |
//! | [`constants`] | Centralized configuration constants |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |

pub mod config;
pub mod constants;
pub mod di;
pub mod error_ext;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, ConfigLoader, LoadedConfig};
pub use di::{
    Bootstrap, Host, ProviderContext, ProviderModule, ProviderRegistrationExt,
    RegistrationTracker, RegistrationTrackerExt, RuntimeTypeCell, ServiceCollection,
    ServiceLifetime, ServiceProvider,
};
pub use error_ext::ErrorContext;
