//! # Provider Abstractions
//!
//! Pluggable provider registration for hosting applications.
//!
//! Provider modules (storage, messaging, secrets, ...) register their
//! services into a host's service container from their own configuration
//! section. Registration is idempotent per container, every instance is
//! validated before anything is wired, and the hosting mode chosen at startup
//! decides the authentication scheme providers use.
//!
//! ## Example
//!
//! ```ignore
//! use pab::infrastructure::{Bootstrap, ConfigLoader};
//! use pab::domain::ports::providers::BlobStorage;
//!
//! let config = ConfigLoader::new().load()?;
//! let host = Bootstrap::new(config).init()?;
//! let storage = host.build().get::<dyn BlobStorage>()?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - markers, runtime types, settings contracts and provider ports
//! - `infrastructure` - service container, registration tracker, config, logging
//! - `providers` - reference provider modules registered at link time
//! - `cli` - the `pab` command line

/// Domain layer - markers, runtime types and provider ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use pab_domain::*;
}

/// Infrastructure layer - DI, config, and logging
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use pab_infrastructure::*;
}

/// Provider implementations
///
/// Re-exports from the providers crate for convenience
pub mod providers {
    pub use pab_providers::*;
}

pub mod cli;

// Re-export commonly used domain types at the crate root
pub use domain::*;

// Re-export the bootstrap entry points
pub use infrastructure::{Bootstrap, ConfigLoader, Host, LoadedConfig};
