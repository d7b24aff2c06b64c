//! Repository access facade
//!
//! Single point of contact with the repository. Every public data
//! operation opens a session, performs the call, and tears the session
//! down; on any failure the session is forcibly closed before the
//! original error is returned to the caller.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::client::{RepositoryClient, RepositoryProvider};
use crate::content::DocumentContent;
use crate::error::{RepositoryError, RepositoryResult};
use crate::search::SearchExpression;
use crate::types::{DocumentInfo, EntryId, EntryKind, TemplateDescriptor};
use crate::values::FieldValues;

/// A session handle owned by one facade operation.
///
/// The sentinel "never logged in" state is an absent client; logging out
/// of it is a no-op.
pub struct Session {
    client: Option<Box<dyn RepositoryClient>>,
}

impl Session {
    fn open(client: Box<dyn RepositoryClient>) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// Create a session that was never logged in.
    #[must_use]
    pub fn never_opened() -> Self {
        Self { client: None }
    }

    /// Check whether the session is live.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> RepositoryResult<&dyn RepositoryClient> {
        self.client.as_deref().ok_or(RepositoryError::NotLoggedIn)
    }

    /// Close the session. Idempotent: closing an already-closed or
    /// never-opened session does nothing.
    pub async fn logout(&mut self) -> RepositoryResult<()> {
        if let Some(mut client) = self.client.take() {
            client.logout().await?;
            debug!("repository session closed");
        }
        Ok(())
    }

    /// Close the session, discarding any logout failure. Used on error
    /// paths where the original error must be preserved.
    async fn force_logout(&mut self) {
        if let Some(mut client) = self.client.take() {
            if let Err(error) = client.logout().await {
                warn!(error = %error, "logout failed while unwinding");
            }
        }
    }
}

/// Facade over a configured repository.
///
/// Owns no session state between calls; each operation connects, runs,
/// and logs out.
pub struct RepositoryFacade {
    provider: Arc<dyn RepositoryProvider>,
}

impl RepositoryFacade {
    /// Create a facade over the given session provider.
    pub fn new(provider: Arc<dyn RepositoryProvider>) -> Self {
        Self { provider }
    }

    /// Open a session. Connection failures are returned to the caller.
    pub async fn connect(&self) -> RepositoryResult<Session> {
        debug!(
            repository = %self.provider.display_name(),
            "opening repository session"
        );
        let client = self.provider.connect().await?;
        Ok(Session::open(client))
    }

    /// Resolve an entry id to a document, following a shortcut to its
    /// target.
    pub async fn document_by_id(&self, id: EntryId) -> RepositoryResult<DocumentInfo> {
        let session = self.connect().await?;
        let result = resolve_document(session.client()?, id).await;
        finish(session, result).await
    }

    /// Read the field-value bag of a document. The bag is read while the
    /// session is still open; the backing store detaches field data on
    /// logout.
    pub async fn document_fields(&self, id: EntryId) -> RepositoryResult<FieldValues> {
        let session = self.connect().await?;
        let result = read_document(session.client()?, id)
            .await
            .map(|(_, fields)| fields);
        finish(session, result).await
    }

    /// Merge a field delta into a document's bag and persist it.
    ///
    /// The merge applies remove-then-add overwrite semantics per key and
    /// is persisted in a single save, so the write is all-or-nothing.
    pub async fn update_document_fields(
        &self,
        id: EntryId,
        delta: &FieldValues,
    ) -> RepositoryResult<(DocumentInfo, FieldValues)> {
        let session = self.connect().await?;
        let result = update_fields(session.client()?, id, delta).await;
        finish(session, result).await
    }

    /// Create a document under `folder`, assign `template`, optionally
    /// attach content decoded from a base64/XML envelope, and set the
    /// given field values.
    pub async fn create_document(
        &self,
        folder: &str,
        name: &str,
        template: &str,
        content_envelope: Option<&str>,
        fields: &FieldValues,
    ) -> RepositoryResult<(DocumentInfo, FieldValues)> {
        // Decode before opening a session; a malformed envelope should
        // not cost a connection.
        let content = content_envelope
            .map(DocumentContent::from_envelope)
            .transpose()?;

        let session = self.connect().await?;
        let result = create(session.client()?, folder, name, template, content, fields).await;
        finish(session, result).await
    }

    /// Enumerate all templates known to the repository.
    pub async fn list_templates(&self) -> RepositoryResult<Vec<TemplateDescriptor>> {
        let session = self.connect().await?;
        let result = session.client()?.templates().await;
        finish(session, result).await
    }

    /// Search for documents scoped to a folder and template, one clause
    /// per field constraint. Matching entries are resolved (following
    /// shortcuts); non-document hits are dropped.
    pub async fn search_documents(
        &self,
        folder: &str,
        template: &str,
        constraints: &FieldValues,
    ) -> RepositoryResult<Vec<(DocumentInfo, FieldValues)>> {
        let expression = SearchExpression::new(folder, template)
            .constraints_from(constraints)
            .build();
        debug!(expression = %expression, "running repository search");

        let session = self.connect().await?;
        let result = search(session.client()?, &expression).await;
        finish(session, result).await
    }
}

/// Log out and return the operation result, preserving the original
/// error over any logout failure.
async fn finish<T>(mut session: Session, result: RepositoryResult<T>) -> RepositoryResult<T> {
    match result {
        Ok(value) => {
            session.logout().await?;
            Ok(value)
        }
        Err(error) => {
            session.force_logout().await;
            Err(error)
        }
    }
}

async fn resolve_document(
    client: &dyn RepositoryClient,
    id: EntryId,
) -> RepositoryResult<DocumentInfo> {
    let mut entry = client.entry_by_id(id).await?;

    if entry.kind == EntryKind::Shortcut {
        let target = entry
            .target_id
            .ok_or(RepositoryError::EntryNotFound { id })?;
        entry = client.entry_by_id(target).await?;
    }

    if !entry.is_document() {
        return Err(RepositoryError::NotADocument { id });
    }

    client.document_info(entry.id).await
}

async fn read_document(
    client: &dyn RepositoryClient,
    id: EntryId,
) -> RepositoryResult<(DocumentInfo, FieldValues)> {
    let doc = resolve_document(client, id).await?;
    let fields = client.read_fields(doc.id).await?;
    Ok((doc, fields))
}

async fn update_fields(
    client: &dyn RepositoryClient,
    id: EntryId,
    delta: &FieldValues,
) -> RepositoryResult<(DocumentInfo, FieldValues)> {
    let (doc, mut fields) = read_document(client, id).await?;
    fields.apply(delta);
    client.write_fields(doc.id, fields.clone()).await?;
    Ok((doc, fields))
}

async fn create(
    client: &dyn RepositoryClient,
    folder: &str,
    name: &str,
    template: &str,
    content: Option<DocumentContent>,
    fields: &FieldValues,
) -> RepositoryResult<(DocumentInfo, FieldValues)> {
    let id = client
        .create_document(folder, name, template, content)
        .await?;

    if !fields.is_empty() {
        client.write_fields(id, fields.clone()).await?;
    }

    let doc = client.document_info(id).await?;
    let bag = client.read_fields(id).await?;
    Ok((doc, bag))
}

async fn search(
    client: &dyn RepositoryClient,
    expression: &str,
) -> RepositoryResult<Vec<(DocumentInfo, FieldValues)>> {
    let ids = client.run_search(expression).await?;
    let mut matches = Vec::with_capacity(ids.len());

    for id in ids {
        let mut entry = client.entry_by_id(id).await?;
        if entry.kind == EntryKind::Shortcut {
            let target = entry
                .target_id
                .ok_or(RepositoryError::EntryNotFound { id })?;
            entry = client.entry_by_id(target).await?;
        }
        if !entry.is_document() {
            continue;
        }

        let doc = client.document_info(entry.id).await?;
        let fields = client.read_fields(entry.id).await?;
        matches.push((doc, fields));
    }

    Ok(matches)
}
