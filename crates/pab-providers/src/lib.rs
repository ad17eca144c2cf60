//! # Provider Abstractions - Provider Implementations
//!
//! Reference provider modules. Each one implements a port defined in
//! `pab-domain`, binds its own configuration section and submits itself to
//! the `PROVIDER_MODULES` registry at link time, so a host only has to link
//! this crate for the providers to become available.
//!
//! ## Provider Categories
//!
//! | Marker | Section | Port | Implementation |
//! |--------|---------|------|----------------|
//! | `storage:in-memory` | `storage` | `BlobStorage` | [`storage::InMemoryBlobStorage`] |
//! | `messaging:in-process` | `messaging` | `MessagePublisher` | [`messaging::InProcessMessageBus`] |
//! | `secrets:env` | `secrets` | `SecretStore` | [`secrets::EnvSecretStore`] |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! pab-providers = { version = "0.1", default-features = false, features = ["storage-memory"] }
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! // Keep the crate linked so its registry entries are collected
//! extern crate pab_providers;
//!
//! let host = Bootstrap::new(config).init()?;
//! let storage = host.build().get::<dyn BlobStorage>()?;
//! ```

pub use pab_domain::error::{Error, Result};
pub use pab_domain::ports::providers::{BlobStorage, MessagePublisher, SecretStore};

/// Provider-specific constants
pub mod constants;

/// Blob storage provider implementations
#[cfg(feature = "storage-memory")]
pub mod storage;

/// Messaging provider implementations
#[cfg(feature = "messaging-tokio")]
pub mod messaging;

/// Secret store provider implementations
#[cfg(feature = "secrets-env")]
pub mod secrets;
