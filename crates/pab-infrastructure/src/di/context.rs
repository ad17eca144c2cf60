//! Runtime context
//!
//! The hosting mode is chosen once during startup. [`RuntimeTypeCell`] is the
//! single guarded slot the host writes it into; [`ProviderContext`] is the
//! immutable value built from it and handed to every provider registration.
//!
//! ```text
//! Unconfigured ──set_runtime_type──▶ Configured (terminal)
//! ```

use pab_domain::error::{Error, Result};
use pab_domain::{AuthScheme, RuntimeType};
use serde::Serialize;
use std::sync::OnceLock;
use tracing::{info, warn};

/// Write-once slot holding the runtime type
///
/// Owned by the host bootstrap. Only the first `set_runtime_type` succeeds,
/// even when several threads race; reads before that fail.
#[derive(Debug, Default)]
pub struct RuntimeTypeCell {
    slot: OnceLock<RuntimeType>,
}

impl RuntimeTypeCell {
    /// Create an unconfigured cell
    pub const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    /// Set the runtime type
    ///
    /// Fails with `Error::RuntimeTypeAlreadyConfigured` on every call after
    /// the first successful one, even if `value` is the stored value.
    pub fn set_runtime_type(&self, value: RuntimeType) -> Result<()> {
        match self.slot.set(value) {
            Ok(()) => {
                info!(runtime_type = %value, "Runtime type configured");
                Ok(())
            }
            Err(rejected) => {
                let current = self.slot.get().copied().unwrap_or(rejected);
                warn!(
                    runtime_type = %rejected,
                    current = %current,
                    "Rejected second runtime type assignment"
                );
                Err(Error::RuntimeTypeAlreadyConfigured { current })
            }
        }
    }

    /// Get the runtime type
    ///
    /// Fails with `Error::RuntimeTypeNotConfigured` before the first
    /// `set_runtime_type`.
    pub fn get_runtime_type(&self) -> Result<RuntimeType> {
        self.slot
            .get()
            .copied()
            .ok_or(Error::RuntimeTypeNotConfigured)
    }

    /// Whether the runtime type has been set
    pub fn is_configured(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Build the provider context from the configured runtime type
    pub fn context(&self) -> Result<ProviderContext> {
        self.get_runtime_type().map(ProviderContext::new)
    }
}

/// Startup context passed to provider registration routines
///
/// Also added to the service collection as a singleton, so services
/// resolved later can read the hosting mode without a global.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProviderContext {
    runtime_type: RuntimeType,
}

impl ProviderContext {
    /// Create a context for the given hosting mode
    pub fn new(runtime_type: RuntimeType) -> Self {
        Self { runtime_type }
    }

    /// Hosting mode of the process
    pub fn runtime_type(&self) -> RuntimeType {
        self.runtime_type
    }

    /// Authentication scheme providers should use
    pub fn auth_scheme(&self) -> AuthScheme {
        self.runtime_type.auth_scheme()
    }
}
