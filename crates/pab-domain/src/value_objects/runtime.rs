//! Hosting runtime type
//!
//! A process hosts providers either as a stateless API or as a stateful
//! application. Providers branch on this value, most visibly when choosing
//! an authentication scheme.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Hosting mode of the current process
///
/// ```toml
/// [runtime]
/// type = "web-api"   # or "web-app"
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum RuntimeType {
    /// Stateless API host, clients authenticate with bearer tokens
    #[serde(alias = "webapi", alias = "web_api", alias = "WebApi")]
    WebApi,

    /// Stateful application host, users authenticate with cookies
    #[serde(alias = "webapp", alias = "web_app", alias = "WebApp")]
    WebApp,
}

impl RuntimeType {
    /// All runtime types, in declaration order
    pub const ALL: [Self; 2] = [Self::WebApi, Self::WebApp];

    /// Canonical configuration spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WebApi => "web-api",
            Self::WebApp => "web-app",
        }
    }

    /// Authentication scheme providers should use under this runtime
    pub fn auth_scheme(&self) -> AuthScheme {
        match self {
            Self::WebApi => AuthScheme::Bearer,
            Self::WebApp => AuthScheme::Cookie,
        }
    }

    /// Check if the host is a stateless API
    pub fn is_web_api(&self) -> bool {
        *self == Self::WebApi
    }

    /// Check if the host is a stateful application
    pub fn is_web_app(&self) -> bool {
        *self == Self::WebApp
    }
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuntimeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "webapi" | "api" => Ok(Self::WebApi),
            "webapp" | "app" => Ok(Self::WebApp),
            _ => Err(Error::invalid_argument(format!(
                "Unknown runtime type '{s}'. Use web-api or web-app"
            ))),
        }
    }
}

/// Authentication scheme selected from the runtime type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    /// `Authorization: Bearer <token>` header
    Bearer,
    /// Session cookie
    Cookie,
}

impl AuthScheme {
    /// Scheme name as used in logs and diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bearer => "bearer",
            Self::Cookie => "cookie",
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
