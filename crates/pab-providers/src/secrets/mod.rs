//! Secret Store Provider Implementations
//!
//! | Provider | Type | Description |
//! |----------|------|-------------|
//! | EnvSecretStore | Process | Reads prefixed environment variables |

pub mod env;

pub use env::{EnvSecretStore, EnvSecretsModule, EnvSecretsSettings};

// Re-export port trait from domain layer
pub use pab_domain::ports::providers::SecretStore;
