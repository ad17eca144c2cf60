//! Value objects shared by hosts and provider modules

pub mod provider;
pub mod runtime;

pub use provider::{ProviderKind, ProviderMarker};
pub use runtime::{AuthScheme, RuntimeType};
