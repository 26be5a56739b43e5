//! Address resolver: maps (namespace, note id) to canonical object
//! keys. Pure formatters; the inputs are validated newtypes, so no
//! value reaching here can escape its namespace prefix.

use nb_core::types::{Namespace, NoteId};

/// Prefix under which every note of `namespace` lives.
pub fn notebook_dir(namespace: &Namespace) -> String {
    format!("{}/notebook", namespace)
}

/// Canonical object key for one note. One object per note; no
/// companion metadata object exists.
pub fn note_object_key(namespace: &Namespace, note_id: &NoteId) -> String {
    format!("{}/notebook/{}/note.json", namespace, note_id)
}
