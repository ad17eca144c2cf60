//! Blob Storage Provider Implementations
//!
//! | Provider | Type | Description |
//! |----------|------|-------------|
//! | InMemoryBlobStorage | In-Process | Concurrent map, lost on restart |

pub mod in_memory;

pub use in_memory::{InMemoryBlobStorage, InMemoryStorageModule, InMemoryStorageSettings};

// Re-export port trait from domain layer
pub use pab_domain::ports::providers::BlobStorage;
