//! Provider ports
//!
//! | Port | Kind |
//! |------|------|
//! | [`BlobStorage`] | storage |
//! | [`MessagePublisher`] | messaging |
//! | [`SecretStore`] | secrets |

pub mod messaging;
pub mod secrets;
pub mod storage;

pub use messaging::MessagePublisher;
pub use secrets::SecretStore;
pub use storage::BlobStorage;
