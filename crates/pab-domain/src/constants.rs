//! Domain layer constants
//!
//! Names shared between provider modules, the configuration loader and the
//! service container. Infrastructure-specific constants live in
//! `pab_infrastructure::constants`.

// ============================================================================
// SETTINGS SHAPE CONSTANTS
// ============================================================================

/// Key holding the named instances inside a provider section
pub const INSTANCES_KEY: &str = "instances";

/// Legacy capitalised spelling of [`INSTANCES_KEY`], accepted as an alias
pub const INSTANCES_KEY_ALIAS: &str = "Instances";

/// Instance name that is also registered as the unkeyed default service
pub const DEFAULT_INSTANCE_NAME: &str = "default";

// ============================================================================
// MARKER CONSTANTS
// ============================================================================

/// Separator between provider kind and provider name in a marker's display form
pub const MARKER_SEPARATOR: char = ':';

/// Separator between a marker and an instance name in diagnostic keys
pub const INSTANCE_KEY_SEPARATOR: char = '/';
