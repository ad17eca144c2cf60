//! # Provider Abstractions - Domain Layer
//!
//! Core types shared by every provider module and by the hosting application.
//! This crate has no knowledge of the service container or of configuration
//! sources; it only defines the contracts both sides agree on.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Domain error type and `Result` alias |
//! | [`constants`] | Shared names and defaults |
//! | [`value_objects`] | Runtime type, auth scheme, provider kind and marker |
//! | [`ports`] | Settings contracts and provider ports |

pub mod constants;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
pub use ports::settings::{InstanceSettings, ProviderInstances, ProviderSettings};
pub use value_objects::{AuthScheme, ProviderKind, ProviderMarker, RuntimeType};
