//! Repository facade error types
//!
//! Error definitions for session, entry, and search operations.

use thiserror::Error;

use crate::types::EntryId;

/// Error that can occur while talking to the document repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Failed to establish a session against the repository.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An operation was attempted without an open session.
    #[error("no active repository session")]
    NotLoggedIn,

    /// No entry exists with the given id.
    #[error("entry not found: {id}")]
    EntryNotFound { id: EntryId },

    /// The entry resolved from the given id is not a document.
    #[error("entry {id} is not a document")]
    NotADocument { id: EntryId },

    /// No template with the given name exists in the catalog.
    #[error("template not found: {name}")]
    TemplateNotFound { name: String },

    /// The document content envelope could not be decoded.
    #[error("invalid document content: {message}")]
    InvalidContent { message: String },

    /// The search expression was rejected by the repository.
    #[error("search failed: {message}")]
    SearchFailed { message: String },

    /// A backend operation failed.
    #[error("operation failed: {message}")]
    OperationFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl RepositoryError {
    /// Check if this error is transient and the operation could be retried
    /// by the caller. The facade itself never retries.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, RepositoryError::ConnectionFailed { .. })
    }

    /// Get an error code for classification.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            RepositoryError::ConnectionFailed { .. } => "CONNECTION_FAILED",
            RepositoryError::NotLoggedIn => "NOT_LOGGED_IN",
            RepositoryError::EntryNotFound { .. } => "ENTRY_NOT_FOUND",
            RepositoryError::NotADocument { .. } => "NOT_A_DOCUMENT",
            RepositoryError::TemplateNotFound { .. } => "TEMPLATE_NOT_FOUND",
            RepositoryError::InvalidContent { .. } => "INVALID_CONTENT",
            RepositoryError::SearchFailed { .. } => "SEARCH_FAILED",
            RepositoryError::OperationFailed { .. } => "OPERATION_FAILED",
        }
    }

    // Convenience constructors

    /// Create a connection failed error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        RepositoryError::ConnectionFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection failed error with source.
    pub fn connection_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RepositoryError::ConnectionFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an operation failed error.
    pub fn operation_failed(message: impl Into<String>) -> Self {
        RepositoryError::OperationFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create an operation failed error with source.
    pub fn operation_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RepositoryError::OperationFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid content error.
    pub fn invalid_content(message: impl Into<String>) -> Self {
        RepositoryError::InvalidContent {
            message: message.into(),
        }
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;
