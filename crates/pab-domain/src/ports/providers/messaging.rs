//! Message Publisher Port

use crate::error::Result;
use async_trait::async_trait;

/// Publishes payloads to named topics
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    /// Publish `payload` to `topic`
    ///
    /// Returns the number of subscribers the message was delivered to.
    /// Publishing to a topic without subscribers is not an error.
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<usize>;

    /// Get the name of this provider implementation
    fn provider_name(&self) -> &str;
}
