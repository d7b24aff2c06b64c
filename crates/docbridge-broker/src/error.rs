//! Broker error types

use thiserror::Error;

use crate::types::MethodKind;
use docbridge_repository::error::RepositoryError;

/// Error that can occur while describing or executing service objects.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// The requested (object, method kind) pair has no handler.
    #[error("method kind {kind} is not implemented for object '{object}'")]
    NotImplemented { object: String, kind: MethodKind },

    /// No service object with the given name was generated.
    #[error("unknown service object: {name}")]
    UnknownObject { name: String },

    /// A required method parameter was missing or had no value.
    #[error("missing required parameter: {name}")]
    MissingParameter { name: String },

    /// A required input property was missing or had no value.
    #[error("missing required property: {name}")]
    MissingProperty { name: String },

    /// An input value could not be converted for the target field.
    #[error("invalid value for '{property}': {message}")]
    InvalidValue { property: String, message: String },

    /// The service-object name could not be correlated to a repository
    /// template.
    #[error("no repository template matches object '{object}'")]
    TemplateCorrelation { object: String },

    /// Broker configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// A repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl BrokerError {
    /// Create a not-implemented error naming the requested method kind.
    pub fn not_implemented(object: impl Into<String>, kind: MethodKind) -> Self {
        BrokerError::NotImplemented {
            object: object.into(),
            kind,
        }
    }

    /// Create a missing-parameter error.
    pub fn missing_parameter(name: impl Into<String>) -> Self {
        BrokerError::MissingParameter { name: name.into() }
    }

    /// Create an invalid-value error.
    pub fn invalid_value(property: impl Into<String>, message: impl Into<String>) -> Self {
        BrokerError::InvalidValue {
            property: property.into(),
            message: message.into(),
        }
    }
}

/// Result type for broker operations.
pub type BrokerResult<T> = Result<T, BrokerError>;
