//! Shared test fixtures for the Carnet workspace.
//!
//! Provides an in-memory [`nb_core::traits::ObjectStore`] double with
//! failure injection, plus note builders and a unique-id helper. Tests
//! run entirely against the double, so the suite needs no external
//! object store.

mod fixtures;

pub use fixtures::*;
