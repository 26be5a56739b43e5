//! # Storage Layer
//!
//! Object-store notebook persistence: one JSON object per note at
//! `<namespace>/notebook/<noteId>/note.json`.

pub mod notebook;
pub mod paths;
pub mod s3;
