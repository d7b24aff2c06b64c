//! # Repository Access Facade
//!
//! Core abstractions for talking to a document repository on behalf of
//! the docbridge service broker.
//!
//! The facade is the single point of contact with the repository: every
//! public operation opens a session, performs the call, and tears the
//! session down again. The vendor SDK itself sits behind the
//! [`RepositoryClient`]/[`RepositoryProvider`] traits; an in-memory
//! backend is included for tests and local development.
//!
//! ## Example
//!
//! ```ignore
//! use docbridge_repository::prelude::*;
//! use std::sync::Arc;
//!
//! let repo = InMemoryRepository::new("Archive");
//! let facade = RepositoryFacade::new(Arc::new(repo));
//!
//! let templates = facade.list_templates().await?;
//! let doc = facade.document_by_id(EntryId(100)).await?;
//! let fields = facade.document_fields(doc.id).await?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`types`] - Entry, document, and template descriptors
//! - [`values`] - The field-value bag exchanged with the repository
//! - [`error`] - Error types
//! - [`client`] - SDK seam traits
//! - [`facade`] - Session-per-operation facade
//! - [`search`] - Search expression builder
//! - [`content`] - Document content envelope
//! - [`memory`] - In-memory backend

pub mod client;
pub mod content;
pub mod error;
pub mod facade;
pub mod memory;
pub mod search;
pub mod types;
pub mod values;

/// Prelude module for convenient imports.
///
/// ```
/// use docbridge_repository::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::{RepositoryClient, RepositoryProvider};
    pub use crate::content::DocumentContent;
    pub use crate::error::{RepositoryError, RepositoryResult};
    pub use crate::facade::{RepositoryFacade, Session};
    pub use crate::memory::InMemoryRepository;
    pub use crate::search::SearchExpression;
    pub use crate::types::{
        DocumentInfo, EntryId, EntryInfo, EntryKind, FieldDescriptor, FieldType,
        TemplateDescriptor,
    };
    pub use crate::values::{FieldValue, FieldValues};
}

// Re-export async_trait for client implementors
pub use async_trait::async_trait;
