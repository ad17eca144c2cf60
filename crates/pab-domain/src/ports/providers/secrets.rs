//! Secret Store Port

use crate::error::Result;
use async_trait::async_trait;

/// Read-only access to named secrets
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Look up a secret, `None` if it is not defined
    async fn get_secret(&self, name: &str) -> Result<Option<String>>;

    /// Look up a secret that must exist
    async fn require_secret(&self, name: &str) -> Result<String> {
        self.get_secret(name)
            .await?
            .ok_or_else(|| crate::error::Error::not_found(format!("secret '{name}'")))
    }

    /// Get the name of this provider implementation
    fn provider_name(&self) -> &str;
}
