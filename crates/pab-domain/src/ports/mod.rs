//! Ports shared by provider modules
//!
//! - [`settings`] - configuration contracts every provider binds against
//! - [`providers`] - service traits the reference providers implement

pub mod providers;
pub mod settings;

pub use providers::{BlobStorage, MessagePublisher, SecretStore};
pub use settings::{InstanceSettings, ProviderInstances, ProviderSettings};
