//! Provider Constants
//!
//! Section names, provider names and defaults shared by the provider
//! modules and their tests.

// ============================================================================
// STORAGE PROVIDER CONSTANTS
// ============================================================================

/// Configuration section of the storage providers
pub const STORAGE_SECTION: &str = "storage";

/// Name of the in-memory storage provider
pub const STORAGE_IN_MEMORY_NAME: &str = "in-memory";

// ============================================================================
// MESSAGING PROVIDER CONSTANTS
// ============================================================================

/// Configuration section of the messaging providers
pub const MESSAGING_SECTION: &str = "messaging";

/// Name of the in-process messaging provider
pub const MESSAGING_IN_PROCESS_NAME: &str = "in-process";

/// Default per-topic channel capacity
pub const MESSAGING_DEFAULT_CAPACITY: usize = 1024;

/// Largest accepted per-topic channel capacity
pub const MESSAGING_MAX_CAPACITY: usize = 1 << 20;

// ============================================================================
// SECRETS PROVIDER CONSTANTS
// ============================================================================

/// Configuration section of the secret providers
pub const SECRETS_SECTION: &str = "secrets";

/// Name of the environment secret provider
pub const SECRETS_ENV_NAME: &str = "env";
