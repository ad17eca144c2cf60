//! Error handling types

use thiserror::Error;

use crate::value_objects::RuntimeType;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for provider registration and configuration
///
/// Every variant describes a startup-time programmer or configuration
/// error. None of them is transient, so callers propagate them instead of
/// retrying.
#[derive(Error, Debug)]
pub enum Error {
    /// A container already holds an incompatible registration for a
    /// service identity that is reserved for internal use
    #[error("Registration conflict for {service}: {message}")]
    RegistrationConflict {
        /// Type name of the service whose registration conflicts
        service: String,
        /// Description of the conflicting registration
        message: String,
    },

    /// The runtime type was set more than once
    #[error("Runtime type is already configured as {current}")]
    RuntimeTypeAlreadyConfigured {
        /// Value stored by the first successful call
        current: RuntimeType,
    },

    /// The runtime type was read before it was set
    #[error("Runtime type is not configured")]
    RuntimeTypeNotConfigured,

    /// A named provider instance failed its settings validation
    #[error("Invalid settings for {provider} instance '{instance}': {message}")]
    Validation {
        /// Provider whose settings were rejected
        provider: String,
        /// Name of the rejected instance
        instance: String,
        /// Reason reported by the instance settings
        message: String,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Resource not found error
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that was not found
        resource: String,
    },

    /// Invalid argument provided to a function
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// I/O operation error
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },

    /// Infrastructure operation error
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the infrastructure error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

// Registration error creation methods
impl Error {
    /// Create a registration conflict error
    pub fn registration_conflict<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::RegistrationConflict {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create a validation error for one provider instance
    pub fn validation<P, I, M>(provider: P, instance: I, message: M) -> Self
    where
        P: Into<String>,
        I: Into<String>,
        M: Into<String>,
    {
        Self::Validation {
            provider: provider.into(),
            instance: instance.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Configuration error creation methods
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Source-carrying error creation methods
impl Error {
    /// Create an I/O error with source
    pub fn io_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an infrastructure error with source
    pub fn infrastructure_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl Error {
    /// Whether this error reports a misuse of the runtime type slot
    pub fn is_runtime_type_error(&self) -> bool {
        matches!(
            self,
            Self::RuntimeTypeAlreadyConfigured { .. } | Self::RuntimeTypeNotConfigured
        )
    }
}
