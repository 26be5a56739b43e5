//! Shared types and traits for the Carnet notebook platform.
//!
//! `nb_core` holds the note data model and the two seams the storage
//! layer plugs into: the [`traits::ObjectStore`] port over a remote
//! key/blob store and the [`traits::NotebookRepo`] port consumed by the
//! notebook management layer. No I/O happens in this crate.

pub mod traits;
pub mod types;
