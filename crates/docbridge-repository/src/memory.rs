//! In-memory repository backend
//!
//! A [`RepositoryProvider`]/[`RepositoryClient`] implementation backed by
//! in-process maps. Used by the test suites and for local development;
//! production deployments bind the real repository SDK behind the same
//! traits.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::client::{RepositoryClient, RepositoryProvider};
use crate::content::DocumentContent;
use crate::error::{RepositoryError, RepositoryResult};
use crate::types::{DocumentInfo, EntryId, EntryInfo, TemplateDescriptor};
use crate::values::FieldValues;

#[derive(Default)]
struct RepoState {
    entries: HashMap<EntryId, EntryInfo>,
    documents: HashMap<EntryId, DocumentInfo>,
    fields: HashMap<EntryId, FieldValues>,
    contents: HashMap<EntryId, DocumentContent>,
    templates: Vec<TemplateDescriptor>,
    search_stubs: HashMap<String, Vec<EntryId>>,
    next_id: i64,
    open_sessions: usize,
    fail_connect: bool,
}

impl RepoState {
    fn allocate_id(&mut self) -> EntryId {
        self.next_id += 1;
        EntryId(self.next_id)
    }
}

/// In-memory repository.
///
/// Cloning yields a handle onto the same underlying state.
#[derive(Clone)]
pub struct InMemoryRepository {
    name: String,
    state: Arc<Mutex<RepoState>>,
}

impl InMemoryRepository {
    /// Create an empty repository with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(RepoState::default())),
        }
    }

    /// Register a template in the catalog.
    pub fn add_template(&self, template: TemplateDescriptor) {
        self.state.lock().templates.push(template);
    }

    /// Add a document with field values; returns its entry id.
    pub fn add_document(
        &self,
        folder: &str,
        name: &str,
        template: &str,
        fields: FieldValues,
    ) -> EntryId {
        let mut state = self.state.lock();
        let id = state.allocate_id();
        let path = format!("{}\\{}", folder.trim_end_matches('\\'), name);

        state.entries.insert(id, EntryInfo::document(id, name));
        state.documents.insert(
            id,
            DocumentInfo::new(id, name)
                .with_path(path)
                .with_template(template),
        );
        state.fields.insert(id, fields);
        id
    }

    /// Add a folder entry; returns its entry id.
    pub fn add_folder(&self, name: &str) -> EntryId {
        let mut state = self.state.lock();
        let id = state.allocate_id();
        state.entries.insert(id, EntryInfo::folder(id, name));
        id
    }

    /// Add a shortcut redirecting to `target`; returns its entry id.
    pub fn add_shortcut(&self, name: &str, target: EntryId) -> EntryId {
        let mut state = self.state.lock();
        let id = state.allocate_id();
        state
            .entries
            .insert(id, EntryInfo::shortcut(id, name, target));
        id
    }

    /// Stub the hit list for an exact search expression.
    pub fn stub_search(&self, expression: &str, hits: Vec<EntryId>) {
        self.state
            .lock()
            .search_stubs
            .insert(expression.to_string(), hits);
    }

    /// Make subsequent connection attempts fail.
    pub fn fail_connections(&self) {
        self.state.lock().fail_connect = true;
    }

    /// Number of sessions currently open.
    #[must_use]
    pub fn open_sessions(&self) -> usize {
        self.state.lock().open_sessions
    }

    /// Stored content for a document, if any.
    #[must_use]
    pub fn content_of(&self, id: EntryId) -> Option<DocumentContent> {
        self.state.lock().contents.get(&id).cloned()
    }
}

#[async_trait]
impl RepositoryProvider for InMemoryRepository {
    async fn connect(&self) -> RepositoryResult<Box<dyn RepositoryClient>> {
        let mut state = self.state.lock();
        if state.fail_connect {
            return Err(RepositoryError::connection_failed(format!(
                "repository '{}' is unreachable",
                self.name
            )));
        }
        state.open_sessions += 1;
        Ok(Box::new(InMemorySession {
            state: Arc::clone(&self.state),
            live: true,
        }))
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

/// One open session against an [`InMemoryRepository`].
struct InMemorySession {
    state: Arc<Mutex<RepoState>>,
    live: bool,
}

impl InMemorySession {
    fn ensure_live(&self) -> RepositoryResult<()> {
        if self.live {
            Ok(())
        } else {
            Err(RepositoryError::NotLoggedIn)
        }
    }
}

#[async_trait]
impl RepositoryClient for InMemorySession {
    async fn logout(&mut self) -> RepositoryResult<()> {
        if self.live {
            self.live = false;
            self.state.lock().open_sessions -= 1;
        }
        Ok(())
    }

    async fn entry_by_id(&self, id: EntryId) -> RepositoryResult<EntryInfo> {
        self.ensure_live()?;
        self.state
            .lock()
            .entries
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::EntryNotFound { id })
    }

    async fn document_info(&self, id: EntryId) -> RepositoryResult<DocumentInfo> {
        self.ensure_live()?;
        self.state
            .lock()
            .documents
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotADocument { id })
    }

    async fn read_fields(&self, id: EntryId) -> RepositoryResult<FieldValues> {
        // Field data is detached once the session closes: reads after
        // logout yield an empty bag, matching the backing store.
        if !self.live {
            return Ok(FieldValues::new());
        }
        self.state
            .lock()
            .fields
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::EntryNotFound { id })
    }

    async fn write_fields(&self, id: EntryId, fields: FieldValues) -> RepositoryResult<()> {
        self.ensure_live()?;
        let mut state = self.state.lock();
        if !state.entries.contains_key(&id) {
            return Err(RepositoryError::EntryNotFound { id });
        }
        state.fields.insert(id, fields);
        Ok(())
    }

    async fn create_document(
        &self,
        folder: &str,
        name: &str,
        template: &str,
        content: Option<DocumentContent>,
    ) -> RepositoryResult<EntryId> {
        self.ensure_live()?;
        let mut state = self.state.lock();

        if !state.templates.iter().any(|t| t.name == template) {
            return Err(RepositoryError::TemplateNotFound {
                name: template.to_string(),
            });
        }

        let id = state.allocate_id();
        let path = format!("{}\\{}", folder.trim_end_matches('\\'), name);
        let page_count = i64::from(content.is_some());

        state.entries.insert(id, EntryInfo::document(id, name));
        state.documents.insert(
            id,
            DocumentInfo::new(id, name)
                .with_path(path)
                .with_page_count(page_count)
                .with_template(template),
        );
        state.fields.insert(id, FieldValues::new());
        if let Some(content) = content {
            state.contents.insert(id, content);
        }
        Ok(id)
    }

    async fn templates(&self) -> RepositoryResult<Vec<TemplateDescriptor>> {
        self.ensure_live()?;
        Ok(self.state.lock().templates.clone())
    }

    async fn run_search(&self, expression: &str) -> RepositoryResult<Vec<EntryId>> {
        self.ensure_live()?;
        let state = self.state.lock();

        if let Some(hits) = state.search_stubs.get(expression) {
            return Ok(hits.clone());
        }

        // No stub: fall back to matching on the template clause alone.
        let template = expression
            .split_once("{TEMPLATE=\"")
            .and_then(|(_, rest)| rest.split_once("\"}"))
            .map(|(name, _)| name)
            .ok_or_else(|| RepositoryError::SearchFailed {
                message: format!("malformed expression: {expression}"),
            })?;

        let mut hits: Vec<EntryId> = state
            .documents
            .values()
            .filter(|doc| doc.template_name.as_deref() == Some(template))
            .map(|doc| doc.id)
            .collect();
        hits.sort();
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldType;

    #[tokio::test]
    async fn test_session_counting() {
        let repo = InMemoryRepository::new("repo");
        let mut session = repo.connect().await.unwrap();
        assert_eq!(repo.open_sessions(), 1);

        session.logout().await.unwrap();
        assert_eq!(repo.open_sessions(), 0);

        // double logout is a no-op
        session.logout().await.unwrap();
        assert_eq!(repo.open_sessions(), 0);
    }

    #[tokio::test]
    async fn test_fields_detach_on_logout() {
        let repo = InMemoryRepository::new("repo");
        repo.add_template(TemplateDescriptor::new("Invoice").with_field("A", FieldType::String));
        let id = repo.add_document("\\", "doc", "Invoice", FieldValues::new().with("A", "x"));

        let mut session = repo.connect().await.unwrap();
        let before = session.read_fields(id).await.unwrap();
        assert_eq!(before.len(), 1);

        session.logout().await.unwrap();
        let after = session.read_fields(id).await.unwrap();
        assert!(after.is_empty());
    }

    #[tokio::test]
    async fn test_create_requires_known_template() {
        let repo = InMemoryRepository::new("repo");
        let session = repo.connect().await.unwrap();
        let err = session
            .create_document("\\", "doc", "Missing", None)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "TEMPLATE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_fallback_search_matches_template() {
        let repo = InMemoryRepository::new("repo");
        repo.add_template(TemplateDescriptor::new("Invoice").with_field("A", FieldType::String));
        repo.add_template(TemplateDescriptor::new("Receipt").with_field("A", FieldType::String));
        let a = repo.add_document("\\", "a", "Invoice", FieldValues::new());
        let _b = repo.add_document("\\", "b", "Receipt", FieldValues::new());

        let session = repo.connect().await.unwrap();
        let hits = session
            .run_search("{LOOKIN=\"\\\"} & {TEMPLATE=\"Invoice\"}")
            .await
            .unwrap();
        assert_eq!(hits, vec![a]);
    }
}
