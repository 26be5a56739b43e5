//! The note repository: list/get/save/remove over an injected
//! [`ObjectStore`], plus status reconciliation on every read path.
//!
//! The repository is stateless between calls apart from its fixed
//! configuration (bucket name and store handle), so a single instance
//! is safe to share across concurrent notebook sessions. Consistency
//! is whatever the store provides: concurrent saves to the same note
//! race and the last committed write wins.

use async_trait::async_trait;
use errors::{RepoError, StoreError};
use std::collections::HashMap;
use std::sync::Arc;

use config::ObjectStoreConfig;
use nb_core::traits::{NotebookRepo, ObjectStore};
use nb_core::types::{Namespace, Note, NoteId, NoteInfo, RepoSettingsInfo, Revision};

use crate::paths;

/// Notebook repository backed by a key/blob object store.
///
/// The store client is an explicit constructor dependency so tests can
/// substitute a double; the repository never constructs its own client.
pub struct ObjectNotebookRepo {
    store: Arc<dyn ObjectStore<Error = StoreError>>,
    bucket: String,
}

impl ObjectNotebookRepo {
    pub fn new(store: Arc<dyn ObjectStore<Error = StoreError>>, config: &ObjectStoreConfig) -> Self {
        Self {
            store,
            bucket: config.bucket.clone(),
        }
    }

    /// Reads, decodes and reconciles the note stored at `key`.
    ///
    /// Documents are decoded as UTF-8 text (the only encoding the
    /// configuration accepts) and parsed tolerating pretty-printed
    /// whitespace and fields this layer does not reconcile.
    async fn load_note(&self, key: &str) -> Result<Note, RepoError> {
        let bytes = self.store.read(&self.bucket, key).await?;

        let text = String::from_utf8(bytes).map_err(|e| RepoError::Decode {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        let mut note: Note = serde_json::from_str(&text).map_err(|e| RepoError::Decode {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        let aborted = note.abort_interrupted();
        if aborted > 0 {
            tracing::warn!(
                key = %key,
                aborted,
                "rewrote interrupted paragraph statuses to ABORT"
            );
        }

        Ok(note)
    }
}

#[async_trait]
impl NotebookRepo for ObjectNotebookRepo {
    type Error = RepoError;

    async fn list(&self, namespace: &Namespace) -> Result<Vec<NoteInfo>, RepoError> {
        let prefix = paths::notebook_dir(namespace);
        let keys = self.store.list(&self.bucket, &prefix).await?;
        tracing::debug!(namespace = %namespace, count = keys.len(), "listing notebook objects");

        // One full fetch per key; a failed item fails the whole
        // listing rather than producing a silently short result.
        let mut infos = Vec::with_capacity(keys.len());
        for key in keys {
            let note = match self.load_note(&key).await {
                Ok(note) => note,
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "listing failed on object");
                    return Err(e);
                }
            };
            infos.push(NoteInfo::from(&note));
        }
        Ok(infos)
    }

    async fn get(&self, namespace: &Namespace, note_id: &NoteId) -> Result<Note, RepoError> {
        let key = paths::note_object_key(namespace, note_id);
        tracing::debug!(key = %key, "loading note");
        self.load_note(&key).await
    }

    async fn save(&self, namespace: &Namespace, note: &Note) -> Result<(), RepoError> {
        let key = paths::note_object_key(namespace, &note.id);

        // Pretty-printed, matching what human operators expect to see
        // when inspecting the bucket directly.
        let bytes = serde_json::to_vec_pretty(note).map_err(|e| RepoError::Io {
            operation: "serialize".to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!(key = %key, bytes = bytes.len(), "saving note");
        self.store.write(&self.bucket, &key, bytes).await?;
        Ok(())
    }

    async fn remove(&self, namespace: &Namespace, note_id: &NoteId) -> Result<(), RepoError> {
        let key = paths::note_object_key(namespace, note_id);
        tracing::debug!(key = %key, "removing note");
        match self.store.delete(&self.bucket, &key).await {
            // Removing an already-absent note is idempotent success.
            Err(StoreError::NotFound { .. }) | Ok(()) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn close(&self) -> Result<(), RepoError> {
        // No pooled resources are held; repeat calls are harmless.
        Ok(())
    }

    async fn checkpoint(
        &self,
        _namespace: &Namespace,
        _note_id: &NoteId,
        _message: &str,
    ) -> Result<Revision, RepoError> {
        Err(RepoError::unsupported("checkpoint"))
    }

    async fn get_revision(
        &self,
        _namespace: &Namespace,
        _note_id: &NoteId,
        _revision_id: &str,
    ) -> Result<Note, RepoError> {
        Err(RepoError::unsupported("get_revision"))
    }

    async fn revision_history(
        &self,
        _namespace: &Namespace,
        _note_id: &NoteId,
    ) -> Result<Vec<Revision>, RepoError> {
        Err(RepoError::unsupported("revision_history"))
    }

    async fn set_note_revision(
        &self,
        _namespace: &Namespace,
        _note_id: &NoteId,
        _revision_id: &str,
    ) -> Result<Note, RepoError> {
        Err(RepoError::unsupported("set_note_revision"))
    }

    async fn get_settings(
        &self,
        _namespace: &Namespace,
    ) -> Result<Vec<RepoSettingsInfo>, RepoError> {
        Err(RepoError::unsupported("get_settings"))
    }

    async fn update_settings(
        &self,
        _namespace: &Namespace,
        _settings: HashMap<String, String>,
    ) -> Result<(), RepoError> {
        Err(RepoError::unsupported("update_settings"))
    }
}
