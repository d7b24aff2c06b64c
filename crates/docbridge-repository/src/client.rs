//! Repository client traits
//!
//! The seam between the facade and whatever binds the actual repository
//! SDK. A [`RepositoryProvider`] opens sessions; a [`RepositoryClient`]
//! is one open session. Implementations are external collaborators; the
//! crate ships [`crate::memory::InMemoryRepository`] for tests and local
//! development.

use async_trait::async_trait;

use crate::content::DocumentContent;
use crate::error::RepositoryResult;
use crate::types::{DocumentInfo, EntryId, EntryInfo, TemplateDescriptor};
use crate::values::FieldValues;

/// An open session against a repository.
///
/// All operations assume the session is live; field data is detached
/// from a session on logout, so callers must finish reading before
/// [`RepositoryClient::logout`].
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    /// Close the session. Must be idempotent.
    async fn logout(&mut self) -> RepositoryResult<()>;

    /// Look up an entry by id, without following shortcuts.
    async fn entry_by_id(&self, id: EntryId) -> RepositoryResult<EntryInfo>;

    /// Fetch the document description for a document entry.
    async fn document_info(&self, id: EntryId) -> RepositoryResult<DocumentInfo>;

    /// Read the field-value bag of a document.
    async fn read_fields(&self, id: EntryId) -> RepositoryResult<FieldValues>;

    /// Persist a full field-value bag for a document.
    async fn write_fields(&self, id: EntryId, fields: FieldValues) -> RepositoryResult<()>;

    /// Create a document under a folder path, assign a template, and
    /// optionally attach binary content. Returns the new entry id.
    async fn create_document(
        &self,
        folder: &str,
        name: &str,
        template: &str,
        content: Option<DocumentContent>,
    ) -> RepositoryResult<EntryId>;

    /// Enumerate the template catalog.
    async fn templates(&self) -> RepositoryResult<Vec<TemplateDescriptor>>;

    /// Run a search expression, returning the matching entry ids.
    async fn run_search(&self, expression: &str) -> RepositoryResult<Vec<EntryId>>;
}

/// Factory opening sessions against a configured repository.
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    /// Open a new session.
    async fn connect(&self) -> RepositoryResult<Box<dyn RepositoryClient>>;

    /// Display name of the backing repository (for logging).
    fn display_name(&self) -> &str;
}
