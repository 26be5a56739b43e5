use std::collections::HashMap;
use std::sync::Arc;

use config::ObjectStoreConfig;
use errors::RepoError;
use nb_core::traits::NotebookRepo;
use nb_core::types::{Namespace, NoteId, ParagraphStatus};
use storage::notebook::ObjectNotebookRepo;
use testing::{InMemoryObjectStore, note_with_statuses, unique_namespace};

const BUCKET: &str = "test-bucket";

fn repo_with_store() -> (Arc<InMemoryObjectStore>, ObjectNotebookRepo) {
    let store = Arc::new(InMemoryObjectStore::new());
    let config = ObjectStoreConfig {
        bucket: BUCKET.to_string(),
        ..ObjectStoreConfig::default()
    };
    let repo = ObjectNotebookRepo::new(store.clone(), &config);
    (store, repo)
}

fn ns(s: &str) -> Namespace {
    Namespace::new(s.to_string()).unwrap()
}

fn id(s: &str) -> NoteId {
    NoteId::new(s.to_string()).unwrap()
}

#[tokio::test]
async fn save_places_object_at_canonical_key() {
    let (store, repo) = repo_with_store();
    let note = note_with_statuses("n1", "Demo", &[ParagraphStatus::Running]);

    repo.save(&ns("alice"), &note).await.unwrap();

    assert!(store.contains(BUCKET, "alice/notebook/n1/note.json"));

    // Stored form is pretty-printed JSON.
    let raw = store.raw_object(BUCKET, "alice/notebook/n1/note.json").unwrap();
    let text = String::from_utf8(raw).unwrap();
    assert!(text.contains('\n'));
    assert!(text.contains("\"RUNNING\""));
}

#[tokio::test]
async fn save_replaces_the_existing_object() {
    let (store, repo) = repo_with_store();
    repo.save(&ns("alice"), &note_with_statuses("n1", "First", &[]))
        .await
        .unwrap();
    repo.save(&ns("alice"), &note_with_statuses("n1", "Second", &[]))
        .await
        .unwrap();

    // Create-or-replace: still one object, carrying the latest write.
    assert_eq!(store.object_count(), 1);
    let loaded = repo.get(&ns("alice"), &id("n1")).await.unwrap();
    assert_eq!(loaded.name, "Second");
}

#[tokio::test]
async fn get_rewrites_interrupted_statuses_to_abort() {
    let (_store, repo) = repo_with_store();
    let note = note_with_statuses(
        "n1",
        "Demo",
        &[
            ParagraphStatus::Pending,
            ParagraphStatus::Running,
            ParagraphStatus::Completed,
        ],
    );
    repo.save(&ns("alice"), &note).await.unwrap();

    let loaded = repo.get(&ns("alice"), &id("n1")).await.unwrap();
    let statuses: Vec<_> = loaded.paragraphs.iter().map(|p| p.status).collect();
    assert_eq!(
        statuses,
        vec![
            ParagraphStatus::Abort,
            ParagraphStatus::Abort,
            ParagraphStatus::Completed,
        ]
    );

    // Everything except the rewritten statuses is unchanged.
    assert_eq!(loaded.id, note.id);
    assert_eq!(loaded.name, note.name);
    assert_eq!(loaded.paragraphs[0].text, note.paragraphs[0].text);
}

#[tokio::test]
async fn get_does_not_write_reconciliation_back() {
    let (store, repo) = repo_with_store();
    let note = note_with_statuses("n1", "Demo", &[ParagraphStatus::Running]);
    repo.save(&ns("alice"), &note).await.unwrap();

    let _ = repo.get(&ns("alice"), &id("n1")).await.unwrap();

    let raw = store.raw_object(BUCKET, "alice/notebook/n1/note.json").unwrap();
    let text = String::from_utf8(raw).unwrap();
    assert!(text.contains("\"RUNNING\""), "stored object was mutated");
}

#[tokio::test]
async fn get_is_a_noop_without_interrupted_paragraphs() {
    let (_store, repo) = repo_with_store();
    let note = note_with_statuses(
        "n2",
        "Done",
        &[
            ParagraphStatus::Completed,
            ParagraphStatus::Error,
            ParagraphStatus::Ready,
            ParagraphStatus::Abort,
        ],
    );
    repo.save(&ns("alice"), &note).await.unwrap();

    let loaded = repo.get(&ns("alice"), &id("n2")).await.unwrap();
    assert_eq!(loaded, note);
}

#[tokio::test]
async fn round_trip_preserves_order_and_unknown_fields() {
    let (store, repo) = repo_with_store();

    // A document written by a richer producer: extra fields at both
    // levels, pretty-printed.
    let json = r#"{
        "id": "n3",
        "name": "Rich",
        "config": {"looknfeel": "default"},
        "paragraphs": [
            {"id": "p1", "status": "COMPLETED", "results": {"code": "SUCCESS"}},
            {"id": "p2", "status": "READY"}
        ]
    }"#;
    store.put_raw(BUCKET, "alice/notebook/n3/note.json", json.as_bytes().to_vec());

    let loaded = repo.get(&ns("alice"), &id("n3")).await.unwrap();
    assert_eq!(loaded.paragraphs.len(), 2);
    assert_eq!(loaded.paragraphs[0].id.as_deref(), Some("p1"));
    assert_eq!(loaded.paragraphs[1].id.as_deref(), Some("p2"));
    assert!(loaded.extra.contains_key("config"));
    assert!(loaded.paragraphs[0].extra.contains_key("results"));

    // Saving and reloading keeps everything.
    repo.save(&ns("alice"), &loaded).await.unwrap();
    let reloaded = repo.get(&ns("alice"), &id("n3")).await.unwrap();
    assert_eq!(reloaded, loaded);
}

#[tokio::test]
async fn get_missing_note_fails_not_found() {
    let (_store, repo) = repo_with_store();
    let result = repo.get(&ns("alice"), &id("missing")).await;
    assert!(matches!(result, Err(RepoError::NotFound { .. })), "{result:?}");
}

#[tokio::test]
async fn corrupt_object_fails_decode() {
    let (store, repo) = repo_with_store();
    store.put_raw(
        BUCKET,
        "alice/notebook/bad/note.json",
        b"{\"id\": \"bad\", ".to_vec(),
    );

    let result = repo.get(&ns("alice"), &id("bad")).await;
    assert!(matches!(result, Err(RepoError::Decode { .. })), "{result:?}");
}

#[tokio::test]
async fn non_utf8_object_fails_decode() {
    let (store, repo) = repo_with_store();
    store.put_raw(BUCKET, "alice/notebook/bin/note.json", vec![0xff, 0xfe, 0x00]);

    let result = repo.get(&ns("alice"), &id("bin")).await;
    assert!(matches!(result, Err(RepoError::Decode { .. })), "{result:?}");
}

#[tokio::test]
async fn remove_then_get_fails_not_found() {
    let (_store, repo) = repo_with_store();
    let note = note_with_statuses("n1", "Demo", &[ParagraphStatus::Ready]);
    repo.save(&ns("alice"), &note).await.unwrap();

    repo.remove(&ns("alice"), &id("n1")).await.unwrap();

    let result = repo.get(&ns("alice"), &id("n1")).await;
    assert!(matches!(result, Err(RepoError::NotFound { .. })));
}

#[tokio::test]
async fn remove_of_absent_note_is_idempotent_success() {
    let (_store, repo) = repo_with_store();
    repo.remove(&ns("alice"), &id("never-existed")).await.unwrap();
    repo.remove(&ns("alice"), &id("never-existed")).await.unwrap();
}

#[tokio::test]
async fn list_returns_only_this_namespaces_notes() {
    let (_store, repo) = repo_with_store();
    repo.save(&ns("alice"), &note_with_statuses("a1", "Alpha", &[]))
        .await
        .unwrap();
    repo.save(&ns("alice"), &note_with_statuses("a2", "Beta", &[]))
        .await
        .unwrap();
    repo.save(&ns("bob"), &note_with_statuses("b1", "Other", &[]))
        .await
        .unwrap();

    let mut infos = repo.list(&ns("alice")).await.unwrap();
    infos.sort_by(|a, b| a.id.cmp(&b.id));

    let names: Vec<_> = infos.iter().map(|i| (i.id.as_str(), i.name.as_str())).collect();
    assert_eq!(names, vec![("a1", "Alpha"), ("a2", "Beta")]);
}

#[tokio::test]
async fn list_excludes_removed_notes() {
    let (_store, repo) = repo_with_store();
    repo.save(&ns("alice"), &note_with_statuses("a1", "Alpha", &[]))
        .await
        .unwrap();
    repo.save(&ns("alice"), &note_with_statuses("a2", "Beta", &[]))
        .await
        .unwrap();
    repo.remove(&ns("alice"), &id("a1")).await.unwrap();

    let infos = repo.list(&ns("alice")).await.unwrap();
    assert_eq!(infos.len(), 1);
    assert_eq!(infos[0].id.as_str(), "a2");
}

#[tokio::test]
async fn list_of_empty_namespace_is_empty() {
    let (_store, repo) = repo_with_store();
    let infos = repo.list(&ns("nobody")).await.unwrap();
    assert!(infos.is_empty());
}

#[tokio::test]
async fn list_fails_when_one_object_fails_to_load() {
    let (store, repo) = repo_with_store();
    repo.save(&ns("alice"), &note_with_statuses("ok", "Fine", &[]))
        .await
        .unwrap();
    repo.save(&ns("alice"), &note_with_statuses("broken", "Bad", &[]))
        .await
        .unwrap();
    store.poison(BUCKET, "alice/notebook/broken/note.json");

    let result = repo.list(&ns("alice")).await;
    assert!(matches!(result, Err(RepoError::Io { .. })), "{result:?}");
}

#[tokio::test]
async fn concurrent_readers_share_one_repo() {
    let (_store, repo) = repo_with_store();
    let repo = Arc::new(repo);
    let namespace = unique_namespace();
    repo.save(
        &namespace,
        &note_with_statuses("n1", "Shared", &[ParagraphStatus::Running]),
    )
    .await
    .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let repo = repo.clone();
        let namespace = namespace.clone();
        handles.push(tokio::spawn(async move {
            repo.get(&namespace, &id("n1")).await.unwrap()
        }));
    }
    for handle in handles {
        let note = handle.await.unwrap();
        assert_eq!(note.paragraphs[0].status, ParagraphStatus::Abort);
    }
}

#[tokio::test]
async fn close_is_safe_to_repeat() {
    let (_store, repo) = repo_with_store();
    repo.close().await.unwrap();
    repo.close().await.unwrap();
}

#[tokio::test]
async fn revision_and_settings_surface_signals_unsupported() {
    let (_store, repo) = repo_with_store();
    let namespace = ns("alice");
    let note_id = id("n1");

    let unsupported = |result: Result<(), RepoError>| {
        assert!(matches!(result, Err(RepoError::Unsupported { .. })));
    };

    unsupported(
        repo.checkpoint(&namespace, &note_id, "before upgrade")
            .await
            .map(|_| ()),
    );
    unsupported(
        repo.get_revision(&namespace, &note_id, "rev-1")
            .await
            .map(|_| ()),
    );
    unsupported(repo.revision_history(&namespace, &note_id).await.map(|_| ()));
    unsupported(
        repo.set_note_revision(&namespace, &note_id, "rev-1")
            .await
            .map(|_| ()),
    );
    unsupported(repo.get_settings(&namespace).await.map(|_| ()));
    unsupported(
        repo.update_settings(&namespace, HashMap::new())
            .await
            .map(|_| ()),
    );
}
