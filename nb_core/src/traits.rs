//! Ports between the notebook layer and its storage backends.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::types::{Namespace, Note, NoteId, NoteInfo, RepoSettingsInfo, Revision};

/// Key/blob object store addressed by (bucket, key).
///
/// Retry, backoff and timeout policy belong to the implementation; a
/// failure surfacing here has already exhausted whatever budget the
/// client was configured with.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    type Error;

    /// Flat listing of every key under `prefix`.
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, Self::Error>;

    /// Full contents of the object at `key`.
    async fn read(&self, bucket: &str, key: &str) -> Result<Vec<u8>, Self::Error>;

    /// Create-or-replace write of `bytes` at `key`.
    async fn write(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<(), Self::Error>;

    /// Delete the object at `key`. Deleting an absent key succeeds.
    async fn delete(&self, bucket: &str, key: &str) -> Result<(), Self::Error>;
}

/// Notebook persistence backend consumed by the notebook management
/// layer.
///
/// Implementations are stateless between calls and safe to share across
/// concurrent sessions. Backends that do not implement the revision or
/// settings surface must fail those calls with their `Unsupported`
/// error rather than returning an empty default, so callers can tell
/// "no revisions yet" apart from "revisions do not exist here".
#[async_trait]
pub trait NotebookRepo: Send + Sync {
    type Error;

    /// Every note stored under `namespace`, reduced to summaries.
    /// Order is store-defined.
    async fn list(&self, namespace: &Namespace) -> Result<Vec<NoteInfo>, Self::Error>;

    /// Loads one note, with interrupted paragraph statuses already
    /// rewritten to `ABORT`.
    async fn get(&self, namespace: &Namespace, note_id: &NoteId) -> Result<Note, Self::Error>;

    /// Create-or-replace persistence of `note`; last writer wins.
    async fn save(&self, namespace: &Namespace, note: &Note) -> Result<(), Self::Error>;

    /// Deletes the note. Removing an absent note is idempotent success.
    async fn remove(&self, namespace: &Namespace, note_id: &NoteId) -> Result<(), Self::Error>;

    /// Releases held resources. Safe to call more than once.
    async fn close(&self) -> Result<(), Self::Error>;

    async fn checkpoint(
        &self,
        namespace: &Namespace,
        note_id: &NoteId,
        message: &str,
    ) -> Result<Revision, Self::Error>;

    async fn get_revision(
        &self,
        namespace: &Namespace,
        note_id: &NoteId,
        revision_id: &str,
    ) -> Result<Note, Self::Error>;

    async fn revision_history(
        &self,
        namespace: &Namespace,
        note_id: &NoteId,
    ) -> Result<Vec<Revision>, Self::Error>;

    async fn set_note_revision(
        &self,
        namespace: &Namespace,
        note_id: &NoteId,
        revision_id: &str,
    ) -> Result<Note, Self::Error>;

    async fn get_settings(&self, namespace: &Namespace)
    -> Result<Vec<RepoSettingsInfo>, Self::Error>;

    async fn update_settings(
        &self,
        namespace: &Namespace,
        settings: HashMap<String, String>,
    ) -> Result<(), Self::Error>;
}
