//! Provider kinds and registration markers
//!
//! A [`ProviderMarker`] is the identity a provider module records in a
//! container once it has been wired up. Markers are plain values (a kind
//! plus a name), so they can be declared as `const` items next to the
//! provider they identify.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::constants::MARKER_SEPARATOR;
use crate::error::Error;

/// Infrastructure concern a provider implements
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Blob and file storage
    Storage,
    /// Message buses and queues
    Messaging,
    /// Secret stores and key vaults
    Secrets,
    /// Caches
    Cache,
    /// Databases
    Database,
    /// Email delivery
    Email,
}

impl ProviderKind {
    /// All provider kinds, in declaration order
    pub const ALL: [Self; 6] = [
        Self::Storage,
        Self::Messaging,
        Self::Secrets,
        Self::Cache,
        Self::Database,
        Self::Email,
    ];

    /// Lowercase name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Storage => "storage",
            Self::Messaging => "messaging",
            Self::Secrets => "secrets",
            Self::Cache => "cache",
            Self::Database => "database",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lower)
            .ok_or_else(|| Error::invalid_argument(format!("Unknown provider kind '{s}'")))
    }
}

/// Identity recorded in a container once a provider has been registered
///
/// # Example
///
/// ```
/// use pab_domain::{ProviderKind, ProviderMarker};
///
/// const MARKER: ProviderMarker = ProviderMarker::new(ProviderKind::Storage, "in-memory");
/// assert_eq!(MARKER.to_string(), "storage:in-memory");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProviderMarker {
    kind: ProviderKind,
    name: Cow<'static, str>,
}

impl ProviderMarker {
    /// Create a marker from a static name, usable in `const` context
    pub const fn new(kind: ProviderKind, name: &'static str) -> Self {
        Self {
            kind,
            name: Cow::Borrowed(name),
        }
    }

    /// Create a marker from a name only known at runtime
    pub fn dynamic<S: Into<String>>(kind: ProviderKind, name: S) -> Self {
        Self {
            kind,
            name: Cow::Owned(name.into()),
        }
    }

    /// Provider kind
    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// Provider name, unique within its kind
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ProviderMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.kind, MARKER_SEPARATOR, self.name)
    }
}

impl FromStr for ProviderMarker {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, name) = s.split_once(MARKER_SEPARATOR).ok_or_else(|| {
            Error::invalid_argument(format!("Provider marker '{s}' must look like <kind>:<name>"))
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid_argument(format!(
                "Provider marker '{s}' has an empty name"
            )));
        }
        Ok(Self::dynamic(kind.parse()?, name))
    }
}
