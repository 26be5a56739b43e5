//! # Carnet Errors
//!
//! Typed failures for the notebook persistence stack.
//!
//! - `thiserror` enums with named fields
//! - no failure is swallowed or converted to a silent default inside
//!   the storage layer; everything surfaces as one of these kinds

use thiserror::Error;

/// Object-store level errors, produced by `ObjectStore` backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No object at key: {key}")]
    NotFound { key: String },

    #[error("Store {operation} failed: {reason}")]
    Io { operation: String, reason: String },
}

/// Notebook repository errors, surfaced to the notebook layer.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Note not found: {key}")]
    NotFound { key: String },

    #[error("Store {operation} failed: {reason}")]
    Io { operation: String, reason: String },

    #[error("Stored object {key} does not decode as a note: {reason}")]
    Decode { key: String, reason: String },

    #[error("Operation not supported by this storage backend: {operation}")]
    Unsupported { operation: String },
}

impl RepoError {
    pub fn unsupported(operation: &str) -> Self {
        Self::Unsupported {
            operation: operation.to_string(),
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { key } => Self::NotFound { key },
            StoreError::Io { operation, reason } => Self::Io { operation, reason },
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("Failed to read config file {path}: {reason}")]
    FileRead { path: String, reason: String },

    #[error("Failed to parse config {format}: {reason}")]
    Parse { format: String, reason: String },

    #[error("Invalid environment variable {name}: {reason}")]
    Env { name: String, reason: String },
}
