use async_trait::async_trait;
use dashmap::DashMap;
use errors::StoreError;
use std::sync::atomic::{AtomicU32, Ordering};

use nb_core::traits::ObjectStore;
use nb_core::types::{Namespace, Note, NoteId, Paragraph, ParagraphStatus};

static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

pub fn unique_id(prefix: &str) -> String {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}-{}", prefix, id)
}

pub fn unique_namespace() -> Namespace {
    Namespace::new(unique_id("test-ns")).expect("generated namespace is valid")
}

/// In-memory object store double.
///
/// Keys are scoped by bucket, listings are flat prefix scans, and
/// deletes of absent keys succeed, matching the semantics the real S3
/// backend provides. Individual keys can be poisoned so a read fails
/// with an I/O error, for exercising failure propagation.
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: DashMap<String, Vec<u8>>,
    poisoned: DashMap<String, ()>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn scoped(bucket: &str, key: &str) -> String {
        format!("{}/{}", bucket, key)
    }

    /// Makes every future read of `key` fail with an I/O error.
    pub fn poison(&self, bucket: &str, key: &str) {
        self.poisoned.insert(Self::scoped(bucket, key), ());
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects.contains_key(&Self::scoped(bucket, key))
    }

    pub fn raw_object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .get(&Self::scoped(bucket, key))
            .map(|entry| entry.value().clone())
    }

    /// Plants raw bytes directly, bypassing the repository write path.
    pub fn put_raw(&self, bucket: &str, key: &str, bytes: Vec<u8>) {
        self.objects.insert(Self::scoped(bucket, key), bytes);
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    type Error = StoreError;

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StoreError> {
        let scoped_prefix = Self::scoped(bucket, prefix);
        let bucket_prefix = format!("{}/", bucket);
        Ok(self
            .objects
            .iter()
            .filter(|entry| entry.key().starts_with(&scoped_prefix))
            .filter_map(|entry| {
                entry
                    .key()
                    .strip_prefix(&bucket_prefix)
                    .map(ToString::to_string)
            })
            .collect())
    }

    async fn read(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        let scoped = Self::scoped(bucket, key);
        if self.poisoned.contains_key(&scoped) {
            return Err(StoreError::Io {
                operation: "read".to_string(),
                reason: format!("injected failure for {key}"),
            });
        }
        self.objects
            .get(&scoped)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound {
                key: key.to_string(),
            })
    }

    async fn write(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        self.objects.insert(Self::scoped(bucket, key), bytes);
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        self.objects.remove(&Self::scoped(bucket, key));
        Ok(())
    }
}

/// A note whose paragraphs carry the given statuses, in order.
pub fn note_with_statuses(id: &str, name: &str, statuses: &[ParagraphStatus]) -> Note {
    let mut note = Note::new(
        NoteId::new(id.to_string()).expect("test note id is valid"),
        name,
    );
    note.paragraphs = statuses
        .iter()
        .map(|status| {
            let mut paragraph = Paragraph::with_status(*status);
            paragraph.text = Some(format!("print({status})"));
            paragraph
        })
        .collect();
    note
}
