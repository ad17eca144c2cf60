//! Blob Storage Port

use crate::error::Result;
use async_trait::async_trait;

/// Named binary objects grouped in a container
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Store `data` under `name`, replacing any previous blob
    async fn put(&self, name: &str, data: Vec<u8>) -> Result<()>;

    /// Fetch a blob, `None` if it does not exist
    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>>;

    /// Delete a blob, returning whether it existed
    async fn delete(&self, name: &str) -> Result<bool>;

    /// Check whether a blob exists
    async fn exists(&self, name: &str) -> Result<bool>;

    /// List blob names starting with `prefix`, sorted
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Container this storage instance is bound to
    fn container(&self) -> &str;

    /// Get the name of this provider implementation
    fn provider_name(&self) -> &str;
}
